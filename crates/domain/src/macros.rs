//! Macro for implementing Display and FromStr for keyword enums
//!
//! Option values such as `--retry-mode exponential` and configuration values
//! such as `logging.format = "json"` are parsed case-insensitively and always
//! printed in lowercase.
//!
//! # Example
//!
//! ```rust
//! use cloudcmd_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Preview,
//! }
//!
//! impl_keyword_conversions!(Channel {
//!     Stable => "stable",
//!     Preview => "preview",
//! });
//!
//! assert_eq!("PREVIEW".parse::<Channel>(), Ok(Channel::Preview));
//! assert_eq!(Channel::Stable.to_string(), "stable");
//! ```

/// Implements Display and FromStr for an enum of lowercase keywords
///
/// The `FromStr` error lists the accepted keywords so it can be shown to the
/// user unchanged.
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Accepted keywords in declaration order
            pub const KEYWORDS: &'static [&'static str] = &[$($str),+];

            /// The keyword for this variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!(
                        "'{}' is not a valid value; expected one of: {}",
                        s,
                        Self::KEYWORDS.join(", ")
                    )),
                }
            }
        }
    };
}
