//! Error types for environment variable binding

/// Boxed error used as the cause of a failed conversion.
///
/// Capability traits and custom deserializers may return any error type that
/// converts into this, including `String` and `&'static str`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when binding configuration from environment variables.
///
/// This error type covers four failure scenarios:
/// - A malformed prefix or key segment
/// - Missing required environment variables
/// - Type conversion failures
/// - Unconsumed variables reported by the disallowed-variable check
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The prefix or a key segment cannot form a valid environment variable name.
    ///
    /// Raised before any lookup for the affected field happens.
    #[error("invalid specification: {reason}")]
    InvalidSpecification {
        /// What was wrong with the prefix or segment
        reason: String,
    },

    /// Required environment variable is not set.
    ///
    /// Occurs when a `required` field has no exact value, no satisfying nested
    /// fallback and no declared default.
    #[error("required key '{key}' missing value")]
    Required {
        /// Name of the missing environment variable
        key: String,
    },

    /// Failed to convert an environment variable value into the field type.
    #[error("assigning {key} to {field}: converting '{value}' to type {type_name}: {source}")]
    Conversion {
        /// Name of the environment variable that was read
        key: String,
        /// Structural (Rust) name of the field being assigned
        field: String,
        /// Fully qualified name of the target type
        type_name: String,
        /// The offending raw value
        value: String,
        /// Underlying cause reported by the converter
        #[source]
        source: BoxError,
    },

    /// Environment variables under the prefix that no declared field consumes.
    #[error("unrecognized environment variables: {}", names.join(", "))]
    Disallowed {
        /// Every offending variable name, sorted
        names: Vec<String>,
    },
}

impl Error {
    /// Create an invalid specification error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            reason: reason.into(),
        }
    }

    /// Create a missing required variable error (used by macro-generated code)
    #[doc(hidden)]
    pub fn required(key: impl Into<String>) -> Self {
        Self::Required { key: key.into() }
    }

    /// Create a conversion error for target type `T` (used by macro-generated code)
    #[doc(hidden)]
    pub fn conversion<T>(
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        source: BoxError,
    ) -> Self {
        Self::Conversion {
            key: key.into(),
            field: field.into(),
            type_name: std::any::type_name::<T>().to_string(),
            value: value.into(),
            source,
        }
    }
}

/// Causes reported by the built-in conversions.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The value is not one of the accepted boolean literals.
    #[error("invalid boolean literal '{0}' (expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False)")]
    InvalidBool(String),

    /// A mapping item has no key/value delimiter.
    #[error("malformed map item '{0}', expected key:value")]
    MalformedMapItem(String),
}
