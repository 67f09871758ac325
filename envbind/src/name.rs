//! Environment variable key derivation
//!
//! A key is built from an optional root prefix and a path of segments:
//!
//! ```text
//! APP_DATABASE__PRIMARY__HOST
//! ^^^ ^^^^^^^^  ^^^^^^^  ^^^^
//! root  nested  nested   field
//! ```
//!
//! The root is joined with [`WORD_SEPARATOR`], segments with
//! [`NESTING_SEPARATOR`]. Segments derived from field names use the word
//! separator internally, so a segment must never contain the nesting separator.

use crate::error::Error;

/// Separator between words of a segment, and between the root prefix and the path.
pub const WORD_SEPARATOR: &str = "_";

/// Separator between structural nesting levels.
pub const NESTING_SEPARATOR: &str = "__";

/// Insert `_` at word boundaries of an identifier.
///
/// A boundary is a lower-to-upper transition, a letter-to-digit transition, or
/// the last capital of an uppercase run followed by a lowercase letter, so an
/// acronym followed by a capitalized word splits once. Case is left unchanged.
///
/// ```
/// use envbind::name::to_snake_case;
///
/// assert_eq!(to_snake_case("XMLHttpRequest"), "XML_Http_Request");
/// assert_eq!(to_snake_case("UserID"), "User_ID");
/// assert_eq!(to_snake_case("database_url"), "database_url");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c != '_' && chars[i - 1] != '_' {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();

            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_ascii_digit() && prev.is_alphabetic())
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.is_some_and(char::is_lowercase));

            if boundary {
                out.push('_');
            }
        }
        out.push(c);
    }

    out
}

/// Segment derived from a structural field name: snake case, upper-cased.
pub fn field_segment(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

fn check_segment(segment: &str) -> Result<(), Error> {
    if segment.is_empty() {
        return Err(Error::invalid("key segment is empty"));
    }
    if segment.contains(NESTING_SEPARATOR) {
        return Err(Error::invalid(format!(
            "key segment '{segment}' contains the nesting separator '{NESTING_SEPARATOR}'"
        )));
    }
    if segment.starts_with(WORD_SEPARATOR) || segment.ends_with(WORD_SEPARATOR) {
        return Err(Error::invalid(format!(
            "key segment '{segment}' must not start or end with '{WORD_SEPARATOR}'"
        )));
    }
    if segment.contains(['=', '\0']) {
        return Err(Error::invalid(format!(
            "key segment '{segment}' contains '=' or NUL"
        )));
    }
    Ok(())
}

/// Root prefix plus the nesting path accumulated while descending into
/// nested structs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix {
    root: String,
    path: Vec<String>,
}

impl Prefix {
    /// Create a prefix from a root string. An empty root means no prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] if the root ends with `_` or
    /// contains `__`, `=` or NUL.
    pub fn new(root: impl Into<String>) -> Result<Self, Error> {
        let root = root.into();
        if root.ends_with(WORD_SEPARATOR) || root.contains(NESTING_SEPARATOR) {
            return Err(Error::invalid(format!(
                "prefix '{root}' must not end with '{WORD_SEPARATOR}' or contain '{NESTING_SEPARATOR}'"
            )));
        }
        if root.contains(['=', '\0']) {
            return Err(Error::invalid(format!("prefix '{root}' contains '=' or NUL")));
        }
        Ok(Self {
            root,
            path: Vec::new(),
        })
    }

    /// The root prefix string.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Nesting depth below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn segment(tag: Option<&str>, name: &str) -> Result<String, Error> {
        let segment = match tag {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ => field_segment(name),
        };
        check_segment(&segment)?;
        Ok(segment)
    }

    fn join(&self, segment: &str) -> String {
        let mut path = self.path.join(NESTING_SEPARATOR);
        if !path.is_empty() {
            path.push_str(NESTING_SEPARATOR);
        }
        path.push_str(segment);

        if self.root.is_empty() {
            path
        } else {
            format!("{}{WORD_SEPARATOR}{path}", self.root)
        }
    }

    /// Key of a leaf field.
    ///
    /// A non-empty `tag` is used verbatim, otherwise the segment is derived
    /// from `name` with [`field_segment`].
    ///
    /// ```
    /// use envbind::Prefix;
    ///
    /// let prefix = Prefix::new("APP").unwrap();
    /// assert_eq!(prefix.resolve(None, "max_connections").unwrap(), "APP_MAX_CONNECTIONS");
    /// assert_eq!(prefix.resolve(Some("DB_URL"), "database_url").unwrap(), "APP_DB_URL");
    ///
    /// let nested = prefix.descend(None, "database").unwrap();
    /// assert_eq!(nested.resolve(None, "host").unwrap(), "APP_DATABASE__HOST");
    /// ```
    pub fn resolve(&self, tag: Option<&str>, name: &str) -> Result<String, Error> {
        let segment = Self::segment(tag, name)?;
        Ok(self.join(&segment))
    }

    /// Prefix for the fields of a nested container.
    pub fn descend(&self, tag: Option<&str>, name: &str) -> Result<Self, Error> {
        let segment = Self::segment(tag, name)?;
        let mut path = self.path.clone();
        path.push(segment);
        Ok(Self {
            root: self.root.clone(),
            path,
        })
    }
}

/// Shorter keys that may satisfy `key` when it is absent.
///
/// The key is split on [`NESTING_SEPARATOR`] and trailing segments are dropped
/// one at a time, longest candidate first, never going below two segments.
/// Keys without the nesting separator have no fallback.
///
/// ```
/// use envbind::name::fallback_keys;
///
/// assert_eq!(fallback_keys("A__B__C__D"), vec!["A__B__C", "A__B"]);
/// assert!(fallback_keys("A__B").is_empty());
/// assert!(fallback_keys("PLAIN_KEY").is_empty());
/// ```
pub fn fallback_keys(key: &str) -> Vec<String> {
    let parts: Vec<&str> = key.split(NESTING_SEPARATOR).collect();
    (2..parts.len())
        .rev()
        .map(|n| parts[..n].join(NESTING_SEPARATOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        let cases = [
            ("TestField", "Test_Field"),
            ("XMLHttpRequest", "XML_Http_Request"),
            ("Simple", "Simple"),
            ("UserID", "User_ID"),
            ("database_url", "database_url"),
            ("HTTPServer", "HTTP_Server"),
            ("oauth2_token", "oauth_2_token"),
            ("Port8080", "Port_8080"),
            ("already_Split", "already_Split"),
            ("", ""),
        ];

        for (input, want) in cases {
            assert_eq!(to_snake_case(input), want, "input: {input}");
        }
    }

    #[test]
    fn test_field_segment_uppercases() {
        assert_eq!(field_segment("max_connections"), "MAX_CONNECTIONS");
        assert_eq!(field_segment("XMLHttpRequest"), "XML_HTTP_REQUEST");
    }

    #[test]
    fn test_resolve_without_prefix() {
        let prefix = Prefix::default();
        assert_eq!(prefix.resolve(None, "name").unwrap(), "NAME");
        assert_eq!(prefix.resolve(Some("Exact_Case"), "name").unwrap(), "Exact_Case");
    }

    #[test]
    fn test_resolve_empty_tag_falls_back_to_name() {
        let prefix = Prefix::new("APP").unwrap();
        assert_eq!(prefix.resolve(Some(""), "name").unwrap(), "APP_NAME");
    }

    #[test]
    fn test_descend_uses_nesting_separator() {
        let prefix = Prefix::new("FIN").unwrap();
        let db = prefix.descend(Some("DB"), "database").unwrap();
        assert_eq!(db.depth(), 1);
        assert_eq!(db.resolve(None, "host").unwrap(), "FIN_DB__HOST");

        let replica = db.descend(None, "replica").unwrap();
        assert_eq!(replica.resolve(None, "port").unwrap(), "FIN_DB__REPLICA__PORT");
    }

    #[test]
    fn test_descend_without_root() {
        let outer = Prefix::default().descend(None, "outer").unwrap();
        assert_eq!(outer.resolve(None, "inner_field").unwrap(), "OUTER__INNER_FIELD");
    }

    #[test]
    fn test_invalid_prefix() {
        for root in ["APP_", "MY__APP", "A=B", "A\0B"] {
            let result = Prefix::new(root);
            assert!(
                matches!(result, Err(Error::InvalidSpecification { .. })),
                "root: {root:?}"
            );
        }
    }

    #[test]
    fn test_invalid_segment() {
        let prefix = Prefix::default();
        for tag in ["DB__HOST", "A=B", "NUL\0", "DB_", "_HOST", "_"] {
            assert!(matches!(
                prefix.resolve(Some(tag), "field"),
                Err(Error::InvalidSpecification { .. })
            ));
            assert!(matches!(
                prefix.descend(Some(tag), "field"),
                Err(Error::InvalidSpecification { .. })
            ));
        }
    }

    #[test]
    fn test_underscore_edged_field_name_is_rejected() {
        let prefix = Prefix::new("APP").unwrap();
        assert!(matches!(
            prefix.resolve(None, "_private"),
            Err(Error::InvalidSpecification { .. })
        ));
        assert!(matches!(
            prefix.descend(None, "trailing_"),
            Err(Error::InvalidSpecification { .. })
        ));
    }

    #[test]
    fn test_fallback_keys() {
        assert_eq!(
            fallback_keys("APP_OUTER__MIDDLE__INNER__FIELD"),
            vec!["APP_OUTER__MIDDLE__INNER", "APP_OUTER__MIDDLE"]
        );
        assert_eq!(fallback_keys("OUTER__MIDDLE__FIELD"), vec!["OUTER__MIDDLE"]);
        assert!(fallback_keys("OUTER__INNER_FIELD").is_empty());
        assert!(fallback_keys("NAME").is_empty());
    }
}
