//! Bind configuration structs to environment variables
//!
//! `envbind` derives a deterministic environment variable name for every field
//! of a (possibly deeply nested) configuration struct, looks it up with a
//! fallback that tolerates collapsed nesting, and converts the text into the
//! field's type.
//!
//! # Features
//!
//! - **Declarative**: Automatic implementation with `#[derive(Bind)]`
//! - **Nested structs**: `APP_DATABASE__HOST`, with coarser variables accepted
//!   for deeper keys
//! - **Typed conversion**: Primitives, durations, time zones, URLs, sequences
//!   and maps out of the box
//! - **Custom types**: [`Decoder`], [`Setter`], [`TextUnmarshaler`] and
//!   [`BinaryUnmarshaler`], in that order of precedence
//! - **Strictness on demand**: [`check_disallowed`] reports stray variables
//!
//! # Key Names
//!
//! A field's key is its name in snake case, upper-cased, joined to the prefix
//! with `_`. Nested structs join their segments with `__`:
//!
//! | field path               | prefix | key                   |
//! |--------------------------|--------|-----------------------|
//! | `max_connections`        | `""`   | `MAX_CONNECTIONS`     |
//! | `max_connections`        | `APP`  | `APP_MAX_CONNECTIONS` |
//! | `database.host`          | `APP`  | `APP_DATABASE__HOST`  |
//! | `database.replica.port`  | `APP`  | `APP_DATABASE__REPLICA__PORT` |
//!
//! When a key with more than two nesting segments is not set, trailing segments
//! are dropped one at a time: `APP_DATABASE__REPLICA__PORT` is also satisfied
//! by `APP_DATABASE__REPLICA`.
//!
//! # Value Parsing
//!
//! - Strings: `DATABASE_URL=postgres://localhost/db`
//! - Numbers: `MAX_CONNECTIONS=42` (range-checked per width)
//! - Booleans: `DEBUG=true` (`1 t T TRUE true True 0 f F FALSE false False`)
//! - Durations: `TIMEOUT=1m 30s`
//! - Sequences: `HOSTS=a,b,c`
//! - Maps: `LIMITS=read:10,write:5`
//!
//! # Example
//!
//! ```rust
//! use envbind::{Bind, MapEnv};
//! use std::time::Duration;
//!
//! #[derive(Debug, Bind)]
//! struct Database {
//!     host: String,
//!     #[envbind(default = "5432")]
//!     port: u16,
//! }
//!
//! #[derive(Debug, Bind)]
//! struct Config {
//!     #[envbind(required)]
//!     name: String,
//!
//!     #[envbind(default = "30s")]
//!     timeout: Duration,
//!
//!     tags: Vec<String>,
//!
//!     #[envbind(nested)]
//!     database: Database,
//! }
//!
//! # fn main() -> Result<(), envbind::Error> {
//! let env: MapEnv = [
//!     ("APP_NAME", "demo"),
//!     ("APP_TAGS", "blue,green"),
//!     ("APP_DATABASE__HOST", "db.internal"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config: Config = envbind::process_with("APP", &env)?;
//! assert_eq!(config.name, "demo");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.tags, ["blue", "green"]);
//! assert_eq!(config.database.host, "db.internal");
//! assert_eq!(config.database.port, 5432);
//! # Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[envbind(name = "KEY")]`
//!
//! Use `KEY` verbatim as the field's segment instead of its derived name.
//!
//! ## `#[envbind(required)]`
//!
//! Fail with [`Error::Required`] if no value is found. Without it a missing
//! variable leaves the field at `Default::default()`.
//!
//! ## `#[envbind(default = "literal")]`
//!
//! Converted like an environment value when the variable is not set.
//!
//! ## `#[envbind(ignored)]`
//!
//! Never looked up; set to `Default::default()`.
//!
//! ## `#[envbind(nested)]`
//!
//! The field is itself a `Bind` struct whose keys live under this field's
//! segment.
//!
//! ## `#[envbind(deserializer = "path::to::fn")]`
//!
//! Convert with `fn(&str) -> Result<T, E>` before any other strategy.
//!
//! ```rust
//! # use envbind::{Bind, MapEnv};
//! #[derive(Bind)]
//! struct Config {
//!     #[envbind(deserializer = "serde_json::from_str")]
//!     weights: Vec<f64>,
//! }
//! # let env: MapEnv = [("WEIGHTS", "[0.5, 1.5]")].into_iter().collect();
//! # let config: Config = envbind::process_with("", &env).unwrap();
//! # assert_eq!(config.weights, [0.5, 1.5]);
//! ```
//!
//! ## `#[envbind(prefix = "APP")]` (struct level)
//!
//! Root prefix used by the generated `from_env()`.

mod bind;
mod check;
pub mod convert;
#[doc(hidden)]
pub mod de;
pub mod env;
mod error;
pub mod name;

pub use bind::{must_process, process, process_into, process_with, Bind};
pub use check::{check_disallowed, check_disallowed_with};
pub use convert::{BinaryUnmarshaler, Decoder, FromEnvStr, Setter, TextUnmarshaler};
pub use env::{Environment, MapEnv, OsEnv};
pub use envbind_derive::Bind;
pub use error::{BoxError, ConvertError, Error};
pub use name::Prefix;
