//! Detection of environment variables no field consumes

use std::collections::BTreeSet;

use crate::bind::Bind;
use crate::env::{Environment, OsEnv};
use crate::error::Error;
use crate::name::Prefix;

/// Fail if the process environment has variables under `prefix` that `T`
/// never consults.
///
/// # Errors
///
/// [`Error::Disallowed`] listing every offending name, or
/// [`Error::InvalidSpecification`] for a malformed prefix or key segment.
pub fn check_disallowed<T: Bind>(prefix: &str) -> Result<(), Error> {
    check_disallowed_with::<T, _>(prefix, &OsEnv)
}

/// Fail if `env` has variables under `prefix` that `T` never consults.
///
/// Every variable whose name starts with `prefix` (all variables for an empty
/// prefix) must be one of `T`'s declared keys or nested fallback candidates.
///
/// ```
/// use envbind::{Bind, Error, MapEnv};
///
/// #[derive(Bind)]
/// struct Config {
///     name: String,
/// }
///
/// let env: MapEnv = [("APP_NAME", "demo"), ("APP_NAEM", "typo")].into_iter().collect();
/// let err = envbind::check_disallowed_with::<Config, _>("APP", &env).unwrap_err();
/// assert!(matches!(err, Error::Disallowed { names } if names == ["APP_NAEM"]));
/// ```
pub fn check_disallowed_with<T: Bind, E: Environment + ?Sized>(
    prefix: &str,
    env: &E,
) -> Result<(), Error> {
    let root = Prefix::new(prefix)?;
    let mut keys = BTreeSet::new();
    T::declared_keys(&root, &mut keys)?;

    let fold = env.case_insensitive();
    let normalize = |name: &str| {
        if fold {
            name.to_ascii_uppercase()
        } else {
            name.to_string()
        }
    };

    let keys: BTreeSet<String> = keys.iter().map(|key| normalize(key)).collect();
    let prefix = normalize(prefix);

    let mut names: Vec<String> = env
        .vars()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| {
            let normalized = normalize(name);
            normalized.starts_with(&prefix) && !keys.contains(&normalized)
        })
        .collect();

    if names.is_empty() {
        return Ok(());
    }

    names.sort();
    tracing::debug!(prefix = %prefix, count = names.len(), "found unconsumed environment variables");
    Err(Error::Disallowed { names })
}
