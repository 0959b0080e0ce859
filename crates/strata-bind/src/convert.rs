//! Conversion of raw property values into typed values.
//!
//! Values are always strings in a [`Snapshot`]. Conversion happens at the
//! moment a value is read, never ahead of time, so a view always reflects
//! the snapshot it was read from.

use strata_core::{ConfigError, Result, Snapshot};

/// Delimiter between the elements of a list value.
pub const LIST_DELIMITER: char = ',';

/// A type that can be parsed from a single raw property value.
///
/// Implemented for `String`, `bool`, `char`, all integer and float types,
/// `Vec<T>` and `Option<T>`. Enumerations get an implementation from
/// [`config_enum!`](crate::config_enum).
pub trait FromConfigValue: Sized {
    /// Parses `raw`, returning a description of the problem on failure.
    fn from_config_value(raw: &str) -> std::result::Result<Self, String>;

    /// Value used when the key is absent; `None` makes absence an error.
    fn when_absent() -> Option<Self> {
        None
    }

    /// Type name reported in conversion errors.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl FromConfigValue for String {
    fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
        Ok(raw.to_string())
    }

    fn type_name() -> &'static str {
        "String"
    }
}

/// `true`/`false` in any letter case.
impl FromConfigValue for bool {
    fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected 'true' or 'false'".to_string())
        }
    }
}

impl FromConfigValue for char {
    fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err("expected exactly one character".to_string()),
        }
    }
}

macro_rules! impl_from_config_value_numeric {
    ($($ty:ty),*) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
                    raw.trim().parse().map_err(|e| format!("{}", e))
                }
            }
        )*
    };
}

impl_from_config_value_numeric!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Comma-delimited list; elements are trimmed and the empty string is an
/// empty list.
impl<T: FromConfigValue> FromConfigValue for Vec<T> {
    fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        raw.split(LIST_DELIMITER)
            .enumerate()
            .map(|(index, element)| {
                T::from_config_value(element.trim())
                    .map_err(|e| format!("element {} ('{}'): {}", index, element.trim(), e))
            })
            .collect()
    }
}

/// An absent key is `None`; a present value must convert as `T`.
impl<T: FromConfigValue> FromConfigValue for Option<T> {
    fn from_config_value(raw: &str) -> std::result::Result<Self, String> {
        T::from_config_value(raw).map(Some)
    }

    fn when_absent() -> Option<Self> {
        Some(None)
    }
}

/// Looks up `key` in `snapshot` and converts it.
///
/// # Errors
///
/// - `ConfigError::MissingKey` if the key is absent and `T` has no absent value
/// - `ConfigError::Conversion` if the value does not parse as `T`
pub fn convert_entry<T: FromConfigValue>(snapshot: &Snapshot, key: &str) -> Result<T> {
    match snapshot.get(key) {
        Some(raw) => T::from_config_value(raw)
            .map_err(|message| ConfigError::conversion(key, raw, T::type_name(), message)),
        None => T::when_absent().ok_or_else(|| ConfigError::missing_key(key)),
    }
}
