//! Support code for `#[derive(Bind)]`
//!
//! Capability dispatch works on a zero-sized [`Probe<T>`]. Generated code calls
//! `(&&&&Probe::<T>::new()).convert_env(raw)` with every `Via*` trait in scope.
//! Each trait is implemented for a different number of references, so method
//! resolution picks the first trait whose bounds `T` satisfies while peeling
//! references off the receiver:
//!
//! | receiver      | trait                  | requires                       |
//! |---------------|------------------------|--------------------------------|
//! | `&&&&Probe<T>`| [`ViaDecoder`]         | `T: Decoder`                   |
//! | `&&&Probe<T>` | [`ViaSetter`]          | `T: Setter + Default`          |
//! | `&&Probe<T>`  | [`ViaTextUnmarshaler`] | `T: TextUnmarshaler + Default` |
//! | `&Probe<T>`   | [`ViaBinaryUnmarshaler`]| `T: BinaryUnmarshaler + Default`|
//! | `Probe<T>`    | [`ViaFromEnvStr`]      | `T: FromEnvStr`                |
//!
//! A type satisfying none of them fails to compile.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::convert::{BinaryUnmarshaler, Decoder, FromEnvStr, Setter, TextUnmarshaler};
use crate::env::{lookup_nested, Environment};
use crate::error::{BoxError, Error};
use crate::name::fallback_keys;

/// Marker carrying the target type of a conversion.
pub struct Probe<T>(PhantomData<fn() -> T>);

impl<T> Probe<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Clone for Probe<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Probe<T> {}

pub trait ViaDecoder {
    type Target;
    fn convert_env(self, raw: &str) -> Result<Self::Target, BoxError>;
}

impl<T: Decoder> ViaDecoder for &&&&Probe<T> {
    type Target = T;

    fn convert_env(self, raw: &str) -> Result<T, BoxError> {
        T::decode(raw).map_err(Into::into)
    }
}

pub trait ViaSetter {
    type Target;
    fn convert_env(self, raw: &str) -> Result<Self::Target, BoxError>;
}

impl<T: Setter + Default> ViaSetter for &&&Probe<T> {
    type Target = T;

    fn convert_env(self, raw: &str) -> Result<T, BoxError> {
        let mut value = T::default();
        value.set(raw).map_err(Into::into)?;
        Ok(value)
    }
}

pub trait ViaTextUnmarshaler {
    type Target;
    fn convert_env(self, raw: &str) -> Result<Self::Target, BoxError>;
}

impl<T: TextUnmarshaler + Default> ViaTextUnmarshaler for &&Probe<T> {
    type Target = T;

    fn convert_env(self, raw: &str) -> Result<T, BoxError> {
        let mut value = T::default();
        value.unmarshal_text(raw.as_bytes()).map_err(Into::into)?;
        Ok(value)
    }
}

pub trait ViaBinaryUnmarshaler {
    type Target;
    fn convert_env(self, raw: &str) -> Result<Self::Target, BoxError>;
}

impl<T: BinaryUnmarshaler + Default> ViaBinaryUnmarshaler for &Probe<T> {
    type Target = T;

    fn convert_env(self, raw: &str) -> Result<T, BoxError> {
        let mut value = T::default();
        value.unmarshal_binary(raw.as_bytes()).map_err(Into::into)?;
        Ok(value)
    }
}

pub trait ViaFromEnvStr {
    type Target;
    fn convert_env(self, raw: &str) -> Result<Self::Target, BoxError>;
}

impl<T: FromEnvStr> ViaFromEnvStr for Probe<T> {
    type Target = T;

    fn convert_env(self, raw: &str) -> Result<T, BoxError> {
        T::from_env_str(raw)
    }
}

/// Resolve the raw value of a leaf field.
///
/// Priority order:
/// 1. Exact key
/// 2. Nested fallback keys, longest first
/// 3. Declared default literal
///
/// Used by macro-generated code.
pub fn lookup<E: Environment + ?Sized>(
    env: &E,
    key: &str,
    default: Option<&str>,
) -> Option<String> {
    if let Some((matched, value)) = lookup_nested(env, key) {
        if matched == key {
            tracing::trace!(key, "found environment variable");
        } else {
            tracing::debug!(key, fallback = %matched, "satisfied by nested fallback key");
        }
        return Some(value);
    }

    default.map(|value| {
        tracing::debug!(key, "using declared default");
        value.to_string()
    })
}

/// Run a converter, attaching key, field, value and target type to failures.
///
/// Used by macro-generated code.
pub fn convert<T, F>(key: &str, field: &str, raw: &str, converter: F) -> Result<T, Error>
where
    F: FnOnce(&str) -> Result<T, BoxError>,
{
    converter(raw).map_err(|source| Error::conversion::<T>(key, field, raw, source))
}

/// Record a leaf key and its fallback candidates as consulted.
///
/// Used by macro-generated code.
pub fn declare(keys: &mut BTreeSet<String>, key: String) {
    keys.extend(fallback_keys(&key));
    keys.insert(key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    #[derive(Debug, Default, PartialEq)]
    struct Custom {
        value: String,
    }

    impl Decoder for Custom {
        type Error = BoxError;

        fn decode(value: &str) -> Result<Self, Self::Error> {
            Ok(Custom {
                value: format!("decoded:{value}"),
            })
        }
    }

    impl Setter for Custom {
        type Error = BoxError;

        fn set(&mut self, value: &str) -> Result<(), Self::Error> {
            self.value = format!("set:{value}");
            Ok(())
        }
    }

    impl FromEnvStr for Custom {
        fn from_env_str(raw: &str) -> Result<Self, BoxError> {
            Ok(Custom {
                value: format!("builtin:{raw}"),
            })
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Settable(String);

    impl Setter for Settable {
        type Error = String;

        fn set(&mut self, value: &str) -> Result<(), Self::Error> {
            if value.is_empty() {
                return Err("empty".to_string());
            }
            self.0 = format!("set:{value}");
            Ok(())
        }
    }

    impl TextUnmarshaler for Settable {
        type Error = String;

        fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), Self::Error> {
            self.0 = format!("text:{}", String::from_utf8_lossy(text));
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Textual(String);

    impl TextUnmarshaler for Textual {
        type Error = std::str::Utf8Error;

        fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), Self::Error> {
            self.0 = format!("text:{}", std::str::from_utf8(text)?);
            Ok(())
        }
    }

    impl BinaryUnmarshaler for Textual {
        type Error = String;

        fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.0 = format!("binary:{}", data.len());
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Binary(Vec<u8>);

    impl BinaryUnmarshaler for Binary {
        type Error = String;

        fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.0 = data.to_vec();
            Ok(())
        }
    }

    #[test]
    fn test_decoder_wins_over_setter_and_builtin() {
        let value = (&&&&Probe::<Custom>::new()).convert_env("x").unwrap();
        assert_eq!(value.value, "decoded:x");
    }

    #[test]
    fn test_setter_wins_over_text() {
        let value = (&&&&Probe::<Settable>::new()).convert_env("x").unwrap();
        assert_eq!(value, Settable("set:x".to_string()));

        let err = (&&&&Probe::<Settable>::new()).convert_env("").unwrap_err();
        assert_eq!(err.to_string(), "empty");
    }

    #[test]
    fn test_text_wins_over_binary() {
        let value = (&&&&Probe::<Textual>::new()).convert_env("abc").unwrap();
        assert_eq!(value, Textual("text:abc".to_string()));
    }

    #[test]
    fn test_binary_receives_raw_bytes() {
        let value = (&&&&Probe::<Binary>::new()).convert_env("a,b").unwrap();
        assert_eq!(value, Binary(b"a,b".to_vec()));
    }

    #[test]
    fn test_builtin_fallback() {
        let value: u16 = (&&&&Probe::<u16>::new()).convert_env("8080").unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_lookup_priority() {
        let env: MapEnv = [("A__B__C", "exact"), ("X__Y", "fallback")]
            .into_iter()
            .collect();

        assert_eq!(lookup(&env, "A__B__C", Some("default")).as_deref(), Some("exact"));
        assert_eq!(lookup(&env, "X__Y__Z", Some("default")).as_deref(), Some("fallback"));
        assert_eq!(lookup(&env, "NONE", Some("default")).as_deref(), Some("default"));
        assert_eq!(lookup(&env, "NONE", None), None);
    }

    #[test]
    fn test_convert_wraps_failure() {
        let err = convert::<u8, _>("PORT", "port", "300", |raw| Ok(raw.parse::<u8>()?)).unwrap_err();

        match err {
            Error::Conversion {
                key,
                field,
                type_name,
                value,
                ..
            } => {
                assert_eq!(key, "PORT");
                assert_eq!(field, "port");
                assert_eq!(type_name, "u8");
                assert_eq!(value, "300");
            }
            other => panic!("Expected Conversion error, got {other:?}"),
        }
    }

    #[test]
    fn test_declare_includes_fallbacks() {
        let mut keys = BTreeSet::new();
        declare(&mut keys, "A__B__C".to_string());
        declare(&mut keys, "PLAIN".to_string());

        let keys: Vec<_> = keys.into_iter().collect();
        assert_eq!(keys, vec!["A__B", "A__B__C", "PLAIN"]);
    }
}
