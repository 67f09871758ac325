//! Environment variable sources

use std::collections::BTreeMap;

use crate::name::{fallback_keys, NESTING_SEPARATOR};

/// A source of environment variables.
///
/// The binder only ever performs exact lookups and full enumeration, so an
/// implementation decides on its own case semantics.
pub trait Environment {
    /// Exact lookup of a single variable.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Every variable as `(name, value)` pairs.
    fn vars(&self) -> Vec<(String, String)>;

    /// Whether [`lookup`](Self::lookup) ignores case.
    fn case_insensitive(&self) -> bool {
        false
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }

    fn vars(&self) -> Vec<(String, String)> {
        (**self).vars()
    }

    fn case_insensitive(&self) -> bool {
        (**self).case_insensitive()
    }
}

/// The process environment.
///
/// Lookups are case-sensitive, except on Windows where variable names are
/// case-insensitive by platform convention. Values that are not valid UTF-8
/// are converted lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEnv;

impl Environment for OsEnv {
    #[cfg(not(windows))]
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }

    #[cfg(windows)]
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::vars_os().find_map(|(key, value)| {
            key.to_string_lossy()
                .eq_ignore_ascii_case(name)
                .then(|| value.to_string_lossy().into_owned())
        })
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    fn case_insensitive(&self) -> bool {
        cfg!(windows)
    }
}

/// An in-memory, case-sensitive environment.
///
/// ```
/// use envbind::{Environment, MapEnv};
///
/// let env: MapEnv = [("APP_NAME", "demo")].into_iter().collect();
/// assert_eq!(env.lookup("APP_NAME").as_deref(), Some("demo"));
/// assert_eq!(env.lookup("app_name"), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    /// Remove a variable, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable is set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Look up `key`, falling back to shorter nested keys.
///
/// Returns the key that matched together with its value. The fallback chain is
/// [`fallback_keys`] and is only consulted when `key` contains the nesting
/// separator and is itself absent.
pub fn lookup_nested<E: Environment + ?Sized>(env: &E, key: &str) -> Option<(String, String)> {
    if let Some(value) = env.lookup(key) {
        return Some((key.to_string(), value));
    }

    if !key.contains(NESTING_SEPARATOR) {
        return None;
    }

    fallback_keys(key)
        .into_iter()
        .find_map(|candidate| env.lookup(&candidate).map(|value| (candidate, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_map_env_set_and_remove() {
        let mut env_map = MapEnv::new();
        assert!(env_map.is_empty());

        assert_eq!(env_map.set("KEY", "one"), None);
        assert_eq!(env_map.set("KEY", "two"), Some("one".to_string()));
        assert_eq!(env_map.lookup("KEY").as_deref(), Some("two"));
        assert_eq!(env_map.len(), 1);

        assert_eq!(env_map.remove("KEY"), Some("two".to_string()));
        assert_eq!(env_map.lookup("KEY"), None);
    }

    #[test]
    fn test_lookup_nested_prefers_exact() {
        let env_map: MapEnv = [
            ("OUTER__MIDDLE__FIELD", "exact"),
            ("OUTER__MIDDLE", "coarse"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            lookup_nested(&env_map, "OUTER__MIDDLE__FIELD"),
            Some(("OUTER__MIDDLE__FIELD".to_string(), "exact".to_string()))
        );
    }

    #[test]
    fn test_lookup_nested_truncates() {
        let env_map: MapEnv = [("OUTER__MIDDLE", "coarse")].into_iter().collect();

        assert_eq!(
            lookup_nested(&env_map, "OUTER__MIDDLE__FIELD"),
            Some(("OUTER__MIDDLE".to_string(), "coarse".to_string()))
        );
    }

    #[test]
    fn test_lookup_nested_longest_candidate_first() {
        let env_map: MapEnv = [("A__B__C", "deep"), ("A__B", "shallow")]
            .into_iter()
            .collect();

        assert_eq!(
            lookup_nested(&env_map, "A__B__C__D").map(|(_, v)| v),
            Some("deep".to_string())
        );
    }

    #[test]
    fn test_lookup_nested_stops_above_single_segment() {
        let env_map: MapEnv = [("OUTER", "too coarse")].into_iter().collect();
        assert_eq!(lookup_nested(&env_map, "OUTER__FIELD"), None);
    }

    #[test]
    fn test_lookup_without_separator_has_no_fallback() {
        let env_map: MapEnv = [("APP", "value")].into_iter().collect();
        assert_eq!(lookup_nested(&env_map, "APP_NAME"), None);
    }

    #[test]
    #[serial]
    fn test_os_env_lookup() {
        env::set_var("ENVBIND_TEST_OS_LOOKUP", "42");
        assert_eq!(
            OsEnv.lookup("ENVBIND_TEST_OS_LOOKUP").as_deref(),
            Some("42")
        );
        assert!(OsEnv
            .vars()
            .iter()
            .any(|(k, v)| k == "ENVBIND_TEST_OS_LOOKUP" && v == "42"));
        env::remove_var("ENVBIND_TEST_OS_LOOKUP");

        assert_eq!(OsEnv.lookup("ENVBIND_TEST_OS_LOOKUP"), None);
    }

    #[test]
    #[serial]
    #[cfg(not(windows))]
    fn test_os_env_is_case_sensitive() {
        env::set_var("ENVBIND_TEST_CASE", "upper");
        assert_eq!(OsEnv.lookup("envbind_test_case"), None);
        assert!(!OsEnv.case_insensitive());
        env::remove_var("ENVBIND_TEST_CASE");
    }

    #[test]
    #[serial]
    #[cfg(windows)]
    fn test_os_env_is_case_insensitive() {
        env::set_var("ENVBIND_TEST_CASE", "upper");
        assert_eq!(OsEnv.lookup("envbind_test_case").as_deref(), Some("upper"));
        assert!(OsEnv.case_insensitive());
        env::remove_var("ENVBIND_TEST_CASE");
    }
}
