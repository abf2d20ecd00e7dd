//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Identity-provider payloads carry several small string enums (rule match
//! modes, condition operators). This macro provides both conversions from a
//! single variant table, with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use rulesync_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Polarity {
//!     Allow,
//!     Deny,
//! }
//!
//! impl_wire_enum_conversions!(Polarity {
//!     Allow => "allow",
//!     Deny => "deny",
//! });
//!
//! assert_eq!(Polarity::Deny.to_string(), "deny");
//! assert_eq!("ALLOW".parse::<Polarity>(), Ok(Polarity::Allow));
//! ```

/// Implements Display and FromStr traits for wire-level enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase wire
///   representations
#[macro_export]
macro_rules! impl_wire_enum_conversions {
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
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
