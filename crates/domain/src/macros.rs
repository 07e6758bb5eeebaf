//! Macro for implementing Display and FromStr for configuration enums
//!
//! Configuration values arrive as strings from environment variables and CLI
//! flags. This macro provides both conversions from a single mapping so the
//! textual form stays consistent everywhere the enum is named.
//!
//! # Example
//!
//! ```rust
//! use postbox_domain::impl_enum_str_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Fast,
//!     Careful,
//! }
//!
//! impl_enum_str_conversions!(Mode {
//!     Fast => "fast",
//!     Careful => "careful",
//! });
//!
//! assert_eq!("CAREFUL".parse::<Mode>().unwrap(), Mode::Careful);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// - Display writes the mapped lowercase string
/// - FromStr matches case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_enum_str_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
