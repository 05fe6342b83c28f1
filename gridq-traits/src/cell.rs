//! Per-element text capability for the bracketed matrix format.
//!
//! The text layer serializes a matrix as `[[a, b]\n [c, d]]`. How a single
//! cell becomes a token depends on the element type:
//!
//! - numeric types emit bare tokens (`42`, `-1.5`)
//! - everything else emits `"`-quoted tokens with backslash escaping
//!
//! That split is a compile-time property of the element type, carried by
//! [`CellText::NUMERIC`]. Formatting and parsing themselves reuse the std
//! [`Display`] and [`FromStr`] machinery, so implementing the trait for a
//! custom element type is one line once those exist.

use std::fmt::Display;
use std::str::FromStr;

/// Capability trait for element types that can round-trip through the
/// bracketed text format.
///
/// `NUMERIC` selects the token form: `true` writes the [`Display`] output
/// bare, `false` wraps it in double quotes and escapes separator and
/// control characters. Parsing feeds the (unescaped) token to [`FromStr`].
pub trait CellText: Display + FromStr {
    /// Whether tokens of this type are written bare (numeric) or quoted.
    const NUMERIC: bool;
}

// Numeric primitives: bare tokens.
macro_rules! impl_cell_text_numeric {
    ($($t:ty),*) => {
        $(impl CellText for $t {
            const NUMERIC: bool = true;
        })*
    };
}

impl_cell_text_numeric!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

// Everything textual: quoted tokens.
macro_rules! impl_cell_text_quoted {
    ($($t:ty),*) => {
        $(impl CellText for $t {
            const NUMERIC: bool = false;
        })*
    };
}

impl_cell_text_quoted!(String, bool, char);
