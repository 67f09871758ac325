//! Value conversion from raw environment strings
//!
//! A field's type is converted by the first strategy it supports, in this order:
//!
//! 1. [`Decoder`]
//! 2. [`Setter`]
//! 3. [`TextUnmarshaler`]
//! 4. [`BinaryUnmarshaler`]
//! 5. [`FromEnvStr`] (built-in conversions)
//!
//! `Option<T>`, `Box<T>`, `Vec<T>`, `HashMap<K, V>` and `BTreeMap<K, V>` fields
//! are unpacked first so that `T`, `K` and `V` get the full order as well. The
//! choice is made at compile time by `#[derive(Bind)]`.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BoxError, ConvertError};

/// Delimiter between items of a sequence or mapping.
pub const ITEM_SEPARATOR: char = ',';

/// Delimiter between key and value of a mapping item.
pub const KEY_VALUE_SEPARATOR: char = ':';

/// Types that construct themselves from a raw value.
///
/// Takes precedence over every other strategy.
///
/// ```
/// use envbind::Decoder;
///
/// struct Level(u8);
///
/// impl Decoder for Level {
///     type Error = String;
///
///     fn decode(value: &str) -> Result<Self, Self::Error> {
///         match value {
///             "low" => Ok(Level(1)),
///             "high" => Ok(Level(9)),
///             other => Err(format!("unknown level '{other}'")),
///         }
///     }
/// }
/// ```
pub trait Decoder: Sized {
    /// Error returned for values that cannot be decoded.
    type Error: Into<BoxError>;

    /// Decode a raw value.
    fn decode(value: &str) -> Result<Self, Self::Error>;
}

/// Types that update themselves from a raw value.
///
/// The value is set on a `Default` instance.
pub trait Setter {
    /// Error returned for values that cannot be set.
    type Error: Into<BoxError>;

    /// Set `self` from a raw value.
    fn set(&mut self, value: &str) -> Result<(), Self::Error>;
}

/// Types that populate themselves from UTF-8 text.
///
/// Called on a `Default` instance with the raw value's bytes.
pub trait TextUnmarshaler {
    /// Error returned for text that cannot be unmarshaled.
    type Error: Into<BoxError>;

    /// Populate `self` from text.
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), Self::Error>;
}

/// Types that populate themselves from opaque bytes.
///
/// Called on a `Default` instance with the raw value's bytes, untransformed.
pub trait BinaryUnmarshaler {
    /// Error returned for data that cannot be unmarshaled.
    type Error: Into<BoxError>;

    /// Populate `self` from bytes.
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Built-in conversion of a raw value.
///
/// Implemented for primitives, strings, paths, addresses, [`Duration`],
/// [`chrono_tz::Tz`], [`url::Url`] and the supported containers. Implement it
/// for your own types to join the built-in tier.
pub trait FromEnvStr: Sized {
    /// Convert a raw value.
    fn from_env_str(raw: &str) -> Result<Self, BoxError>;

    /// Convert a raw value into a sequence of `Self`.
    ///
    /// Splits on [`ITEM_SEPARATOR`] unless overridden; `u8` takes the raw bytes.
    #[doc(hidden)]
    fn from_env_seq(raw: &str) -> Result<Vec<Self>, BoxError> {
        sequence(raw, Self::from_env_str)
    }
}

/// Split `raw` on [`ITEM_SEPARATOR`] and convert every item in order.
///
/// An empty value is an empty sequence. Items are not trimmed.
pub fn sequence<T, F>(raw: &str, item: F) -> Result<Vec<T>, BoxError>
where
    F: Fn(&str) -> Result<T, BoxError>,
{
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(ITEM_SEPARATOR).map(item).collect()
}

/// Split `raw` into `key:value` items and convert both sides.
///
/// Items split on [`ITEM_SEPARATOR`], then on the first [`KEY_VALUE_SEPARATOR`],
/// so values may themselves contain `:`. Later duplicate keys overwrite earlier
/// ones for map collections.
pub fn mapping<C, K, V, FK, FV>(raw: &str, key: FK, value: FV) -> Result<C, BoxError>
where
    C: FromIterator<(K, V)>,
    FK: Fn(&str) -> Result<K, BoxError>,
    FV: Fn(&str) -> Result<V, BoxError>,
{
    if raw.is_empty() {
        return Ok(std::iter::empty().collect());
    }
    raw.split(ITEM_SEPARATOR)
        .map(|item| -> Result<(K, V), BoxError> {
            let (k, v) = item
                .split_once(KEY_VALUE_SEPARATOR)
                .ok_or_else(|| ConvertError::MalformedMapItem(item.to_string()))?;
            Ok((key(k)?, value(v)?))
        })
        .collect()
}

/// Parse the canonical boolean literals.
pub fn parse_bool(raw: &str) -> Result<bool, ConvertError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConvertError::InvalidBool(raw.to_string())),
    }
}

impl FromEnvStr for String {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        Ok(raw.to_string())
    }
}

impl FromEnvStr for bool {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        Ok(parse_bool(raw)?)
    }
}

impl FromEnvStr for u8 {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        Ok(raw.parse()?)
    }

    fn from_env_seq(raw: &str) -> Result<Vec<Self>, BoxError> {
        Ok(raw.as_bytes().to_vec())
    }
}

macro_rules! from_str_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromEnvStr for $ty {
                fn from_env_str(raw: &str) -> Result<Self, BoxError> {
                    Ok(raw.parse::<$ty>()?)
                }
            }
        )*
    };
}

from_str_impls!(
    i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, f32, f64, char, PathBuf, IpAddr,
    Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl FromEnvStr for Duration {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        Ok(humantime::parse_duration(raw)?)
    }
}

impl FromEnvStr for chrono_tz::Tz {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        raw.parse::<chrono_tz::Tz>()
            .map_err(|e| format!("unknown time zone '{raw}': {e}").into())
    }
}

impl FromEnvStr for url::Url {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        Ok(url::Url::parse(raw)?)
    }
}

impl<T: FromEnvStr> FromEnvStr for Option<T> {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        T::from_env_str(raw).map(Some)
    }
}

impl<T: FromEnvStr> FromEnvStr for Box<T> {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        T::from_env_str(raw).map(Box::new)
    }
}

impl<T: FromEnvStr> FromEnvStr for Vec<T> {
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        T::from_env_seq(raw)
    }
}

impl<K, V, S> FromEnvStr for HashMap<K, V, S>
where
    K: FromEnvStr + Eq + Hash,
    V: FromEnvStr,
    S: BuildHasher + Default,
{
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        mapping(raw, K::from_env_str, V::from_env_str)
    }
}

impl<K, V> FromEnvStr for BTreeMap<K, V>
where
    K: FromEnvStr + Ord,
    V: FromEnvStr,
{
    fn from_env_str(raw: &str) -> Result<Self, BoxError> {
        mapping(raw, K::from_env_str, V::from_env_str)
    }
}
