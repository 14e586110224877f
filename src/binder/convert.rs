// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaf conversions for scalar types.
//!
//! Conversions do not depend on the locale. Integers accept surrounding
//! whitespace, a sign and a `0x` prefix for hexadecimal. Booleans are
//! `true`/`false` in any case. Durations use the `humantime` format, for
//! example `"1m 30s"` or `"250ms"`.

use super::{Bind, TargetKind};
use crate::domain::{ConfigError, Result};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Parses a trimmed leaf with [`FromStr`], reporting failures as
/// [`ConfigError::TypeConversionError`].
pub fn parse_from_str<T>(value: &str, path: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| conversion_error::<T>(value, path, e))
}

/// Builds a conversion error for `value` at `path`.
pub fn conversion_error<T>(
    value: &str,
    path: &str,
    source: impl Into<Box<dyn Error + Send + Sync>>,
) -> ConfigError {
    ConfigError::TypeConversionError {
        key: path.to_string(),
        value: value.to_string(),
        target_type: std::any::type_name::<T>().to_string(),
        source: source.into(),
    }
}

/// Implements [`Bind`] for scalar types through their [`FromStr`] impl.
///
/// The parse error type must implement `std::error::Error`. Such types cannot
/// be created from a section with children.
///
/// ```rust
/// use layercfg::bind_from_str;
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// struct Level(u8);
///
/// impl FromStr for Level {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.trim_start_matches('L').parse().map(Level)
///     }
/// }
///
/// bind_from_str!(Level);
/// ```
#[macro_export]
macro_rules! bind_from_str {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::binder::Bind for $t {
            const KIND: $crate::binder::TargetKind = $crate::binder::TargetKind::Scalar;

            fn activate() -> $crate::domain::Result<Self> {
                Err($crate::domain::ConfigError::activation(
                    ::std::any::type_name::<$t>(),
                    "scalar type cannot be created from a configuration section",
                ))
            }

            fn convert(value: &str, path: &str) -> Option<$crate::domain::Result<Self>> {
                Some($crate::binder::convert::parse_from_str::<$t>(value, path))
            }
        }
    )+};
}

macro_rules! bind_integer {
    ($($t:ty),+ $(,)?) => {$(
        impl Bind for $t {
            const KIND: TargetKind = TargetKind::Scalar;

            fn activate() -> Result<Self> {
                Ok(0)
            }

            fn convert(value: &str, path: &str) -> Option<Result<Self>> {
                let trimmed = value.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => <$t>::from_str_radix(hex, 16),
                    None => trimmed.parse::<$t>(),
                };
                Some(parsed.map_err(|e| {
                    ConfigError::from_parse_int_error(path, value, stringify!($t), e)
                }))
            }
        }
    )+};
}

bind_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! bind_float {
    ($($t:ty),+) => {$(
        impl Bind for $t {
            const KIND: TargetKind = TargetKind::Scalar;

            fn activate() -> Result<Self> {
                Ok(0.0)
            }

            fn convert(value: &str, path: &str) -> Option<Result<Self>> {
                Some(value.trim().parse::<$t>().map_err(|e| {
                    ConfigError::from_parse_float_error(path, value, stringify!($t), e)
                }))
            }
        }
    )+};
}

bind_float!(f32, f64);

impl Bind for bool {
    const KIND: TargetKind = TargetKind::Scalar;

    fn activate() -> Result<Self> {
        Ok(false)
    }

    fn convert(value: &str, path: &str) -> Option<Result<Self>> {
        Some(
            value
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|e| conversion_error::<bool>(value, path, e)),
        )
    }
}

impl Bind for char {
    const KIND: TargetKind = TargetKind::Scalar;

    fn activate() -> Result<Self> {
        Ok('\0')
    }

    // An empty leaf is NUL; longer input is trimmed before it must be a single char.
    fn convert(value: &str, path: &str) -> Option<Result<Self>> {
        if value.is_empty() {
            return Some(Ok('\0'));
        }
        let text = if value.chars().nth(1).is_some() {
            value.trim()
        } else {
            value
        };
        Some(
            text.parse::<char>()
                .map_err(|e| conversion_error::<char>(value, path, e)),
        )
    }
}

impl Bind for String {
    const KIND: TargetKind = TargetKind::Scalar;

    fn activate() -> Result<Self> {
        Ok(String::new())
    }

    fn convert(value: &str, _path: &str) -> Option<Result<Self>> {
        Some(Ok(value.to_string()))
    }
}

impl Bind for PathBuf {
    const KIND: TargetKind = TargetKind::Scalar;

    fn activate() -> Result<Self> {
        Ok(PathBuf::new())
    }

    fn convert(value: &str, _path: &str) -> Option<Result<Self>> {
        Some(Ok(PathBuf::from(value)))
    }
}

impl Bind for Duration {
    const KIND: TargetKind = TargetKind::Scalar;

    fn activate() -> Result<Self> {
        Ok(Duration::ZERO)
    }

    fn convert(value: &str, path: &str) -> Option<Result<Self>> {
        Some(
            humantime::parse_duration(value.trim())
                .map_err(|e| conversion_error::<Duration>(value, path, e)),
        )
    }
}

crate::bind_from_str!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
