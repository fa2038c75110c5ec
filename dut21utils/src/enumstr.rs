//!
//! # Keyword-Enum Mapping Module
//!
//! Primarily defines the [enumstr] macro and paired [EnumStr] trait,
//! for defining a *closed vocabulary* of source keywords as an enum.
//! Hardware description text exposes many of its enumerated values
//! (port directions, net types) as one of a fixed set of keywords.
//! Declaring the vocabulary once, as data, keeps parsers free of keyword branches.
//!
//! The [EnumStr] trait defines three central items:
//! * `to_str(&self) -> &'static str` converts the enum to its keyword.
//! * `from_str(&str) -> Option<Self>` does the opposite, returning an [Option] indicator of success or failure.
//! * `VALUES` lists every accepted keyword, in declaration order. Handy for error messages.
//!
//! Example:
//!
//! ```
//! use dut21utils::{enumstr, EnumStr};
//! use serde::{Deserialize, Serialize};
//!
//! enumstr!(
//!     /// # Clock Edges
//!     Edge {
//!         Pos: "posedge",
//!         Neg: "negedge",
//!     }
//! );
//! assert_eq!(Edge::from_str("negedge"), Some(Edge::Neg));
//! assert_eq!(Edge::VALUES, &["posedge", "negedge"]);
//! ```
//!

///
/// # Keyword-Enumeration Trait
///
/// While [EnumStr] can be implemented by any type, its primary intent is
/// for implementation by the [enumstr] macro.
///
pub trait EnumStr: std::marker::Sized + 'static {
    /// All accepted keywords, in declaration order
    const VALUES: &'static [&'static str];
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
    /// Boolean indication of whether `txt` is one of our keywords
    fn is_keyword(txt: &str) -> bool {
        Self::from_str(txt).is_some()
    }
}

///
/// # Keyword-Enum Pairing Macro
///
/// Creates an `enum` which:
/// * (a) Has paired keyword-values, as they arrive in source text.
/// * (b) Implements the [EnumStr] trait for conversions to and from these keywords.
/// * (c) Implements [std::fmt::Display] writing the keyword.
/// * (d) Serializes (via `serde`) as the keyword, not the variant name.
///
/// All variants are fieldless.
/// Callers must have `serde::{Serialize, Deserialize}` in scope.
/// Additional attributes, e.g. `#[derive(JsonSchema)]`, pass through to the generated enum.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        #[allow(dead_code)]
        #[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
        $(#[$meta])*
        pub enum $enum_name {
            $( #[doc=$strval]
               #[serde(rename = $strval)]
               $variant ),*
        }
        impl $crate::EnumStr for $enum_name {
            const VALUES: &'static [&'static str] = &[ $( $strval ),* ];
            /// Convert a [$enum_name] variant to its paired (static) keyword.
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Create a [$enum_name] from one of its keywords.
            /// Returns `None` if input `txt` does not match one of [$enum_name]'s variants.
            /// Matching is case *sensitive*, as are the keywords of most HDLs.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", $crate::EnumStr::to_str(self))
            }
        }
    }
}
