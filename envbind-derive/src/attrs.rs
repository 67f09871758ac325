//! Attribute parsing for `#[envbind(...)]` annotations.
//!
//! This module extracts and validates binding attributes from structs and their
//! fields during macro expansion.

use syn::{DeriveInput, Field, LitStr, Path};

/// Parsed struct-level `#[envbind(...)]` attributes.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Root prefix used by the generated `from_env()`.
    pub prefix: String,
}

impl StructAttrs {
    pub fn from_input(input: &DeriveInput) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &input.attrs {
            if !attr.path().is_ident("envbind") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("prefix") {
                    let lit: LitStr = meta.value()?.parse()?;
                    let prefix = lit.value();
                    if prefix.ends_with('_') || prefix.contains("__") {
                        return Err(meta.error(
                            "prefix must not end with '_' or contain '__'",
                        ));
                    }
                    if prefix.contains(['=', '\0']) {
                        return Err(meta.error("prefix must not contain '=' or NUL"));
                    }
                    attrs.prefix = prefix;
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level envbind attribute"))
            })?;
        }

        Ok(attrs)
    }
}

/// Parsed `#[envbind(...)]` attributes from a struct field.
///
/// Represents all binding options that can be specified on individual fields
/// of a `Bind`-derived struct.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Key segment override, used verbatim.
    ///
    /// If `None`, the segment is derived from the field name at runtime.
    pub name: Option<String>,

    /// Fail when no value is found instead of falling back to `Default`.
    pub required: bool,

    /// Literal converted like an environment value when the variable is unset.
    pub default: Option<String>,

    /// Skip the field entirely.
    pub ignored: bool,

    /// The field is a `Bind` struct whose keys live under this field's segment.
    pub nested: bool,

    /// Custom deserializer function path (e.g., `"serde_json::from_str"`).
    ///
    /// When specified, bypasses every other conversion strategy.
    pub deserializer: Option<Path>,
}

impl FieldAttrs {
    /// Extract, parse and validate `#[envbind(...)]` attributes from a struct field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("envbind") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.name = Some(lit.value());
                    return Ok(());
                }

                // required
                if meta.path.is_ident("required") {
                    attrs.required = true;
                    return Ok(());
                }

                // default = "..."
                if meta.path.is_ident("default") {
                    if !meta.input.peek(syn::Token![=]) {
                        return Err(meta.error(
                            "default needs a string literal; fields without a value already use Default::default()",
                        ));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.default = Some(lit.value());
                    return Ok(());
                }

                // ignored
                if meta.path.is_ident("ignored") {
                    attrs.ignored = true;
                    return Ok(());
                }

                // nested
                if meta.path.is_ident("nested") {
                    attrs.nested = true;
                    return Ok(());
                }

                // deserializer = "function::path"
                if meta.path.is_ident("deserializer") {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.deserializer = Some(lit.parse()?);
                    return Ok(());
                }

                Err(meta.error("unsupported envbind attribute"))
            })?;
        }

        attrs.validate(field)?;
        Ok(attrs)
    }

    fn validate(&self, field: &Field) -> syn::Result<()> {
        if self.ignored
            && (self.name.is_some()
                || self.required
                || self.default.is_some()
                || self.nested
                || self.deserializer.is_some())
        {
            return Err(syn::Error::new_spanned(
                field,
                "ignored fields cannot have other envbind attributes",
            ));
        }

        if self.nested && (self.required || self.default.is_some() || self.deserializer.is_some()) {
            return Err(syn::Error::new_spanned(
                field,
                "nested fields cannot be required or have a default or deserializer (set them on the inner fields)",
            ));
        }

        Ok(())
    }
}
