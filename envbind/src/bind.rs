//! Struct binding entry points

use std::collections::BTreeSet;

use crate::env::{Environment, OsEnv};
use crate::error::Error;
use crate::name::Prefix;

/// A configuration struct that can be bound from environment variables.
///
/// Implement it with `#[derive(Bind)]`; the generated walk visits fields in
/// declaration order and stops at the first error.
pub trait Bind: Sized {
    /// Build `Self` from `env`, deriving keys from `prefix`.
    fn bind<E: Environment + ?Sized>(prefix: &Prefix, env: &E) -> Result<Self, Error>;

    /// Every key a [`bind`](Self::bind) call may consult, including nested
    /// fallback candidates. Ignored fields contribute nothing.
    fn declared_keys(prefix: &Prefix, keys: &mut BTreeSet<String>) -> Result<(), Error>;
}

/// Bind `T` from the process environment.
///
/// # Errors
///
/// - The prefix or a key segment is malformed
/// - A required variable is not set
/// - A value cannot be converted into its field type
pub fn process<T: Bind>(prefix: &str) -> Result<T, Error> {
    process_with(prefix, &OsEnv)
}

/// Bind `T` from `env`.
///
/// ```
/// use envbind::{Bind, MapEnv};
///
/// #[derive(Debug, Bind)]
/// struct Config {
///     #[envbind(required)]
///     name: String,
///     #[envbind(default = "8080")]
///     port: u16,
/// }
///
/// let env: MapEnv = [("APP_NAME", "demo")].into_iter().collect();
/// let config: Config = envbind::process_with("APP", &env).unwrap();
/// assert_eq!(config.name, "demo");
/// assert_eq!(config.port, 8080);
/// ```
pub fn process_with<T: Bind, E: Environment + ?Sized>(prefix: &str, env: &E) -> Result<T, Error> {
    let root = Prefix::new(prefix)?;
    let type_name = std::any::type_name::<T>();

    tracing::debug!(prefix, config = type_name, "binding configuration");
    let value = T::bind(&root, env)?;
    tracing::debug!(prefix, config = type_name, "configuration bound");

    Ok(value)
}

/// Bind into an existing value from the process environment.
///
/// `dest` is only replaced when the whole struct bound successfully; on error
/// it is left untouched.
pub fn process_into<T: Bind>(prefix: &str, dest: &mut T) -> Result<(), Error> {
    *dest = process(prefix)?;
    Ok(())
}

/// Bind `T` from the process environment, panicking on any error.
///
/// For start-up code that treats invalid configuration as unrecoverable.
///
/// # Panics
///
/// Panics with the error message if [`process`] fails.
pub fn must_process<T: Bind>(prefix: &str) -> T {
    match process(prefix) {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}
