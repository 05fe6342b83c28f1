//! Bracketed text form.
//!
//! The grammar is a fixed external contract: the whole matrix and every
//! row are wrapped in `[` `]`, rows are joined by a newline plus one
//! space, and cells by `", "`. A 2x2 integer matrix renders as
//!
//! ```text
//! [[1, 2]
//!  [3, 4]]
//! ```
//!
//! Element types tagged [`CellText::NUMERIC`] emit their `Display` form
//! bare. Every other element type emits a `"`-quoted token in which
//! newline, carriage return, tab, form feed, backslash, comma, and
//! space are backslash-escaped, so the separators above never occur
//! inside a cell body. Parsing is the exact inverse.

use std::fmt;
use std::str::FromStr;

use gridq_traits::CellText;

use crate::{DenseMatrix, GridError, Result};

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0c' => out.push_str("\\f"),
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ' ' => out.push_str("\\ "),
            other => out.push(other),
        }
    }
}

fn unescape(token: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\x0c'),
            Some('\\') => out.push('\\'),
            Some(',') => out.push(','),
            Some(' ') => out.push(' '),
            Some(other) => return Err(format!("bad escape `\\{other}`")),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}

fn parse_cell<T: CellText>(token: &str) -> std::result::Result<T, String> {
    if T::NUMERIC {
        return T::from_str(token).map_err(|_| format!("cannot parse `{token}`"));
    }
    let body = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted cell, found `{token}`"))?;
    let raw = unescape(body)?;
    T::from_str(&raw).map_err(|_| format!("cannot parse `{token}`"))
}

impl<T: CellText> DenseMatrix<T> {
    /// Render in the bracketed text form described in the module docs.
    ///
    /// A matrix with no cells renders as `[]`, whichever dimension is
    /// zero.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return "[]".to_string();
        }
        let mut out = String::from("[");
        for i in 0..self.rows() {
            if i > 0 {
                out.push_str("\n ");
            }
            out.push('[');
            for j in 0..self.columns() {
                if j > 0 {
                    out.push_str(", ");
                }
                let cell = self[(i, j)].to_string();
                if T::NUMERIC {
                    out.push_str(&cell);
                } else {
                    out.push('"');
                    escape_into(&mut out, &cell);
                    out.push('"');
                }
            }
            out.push(']');
        }
        out.push(']');
        out
    }

    /// Parse the bracketed text form back into a matrix.
    ///
    /// Bracket violations, malformed quoting, and unparseable tokens
    /// come back as [`GridError::InvalidText`] with the offending row
    /// and cell named; uneven row widths come back as
    /// [`GridError::RaggedRows`]. The empty rendering `[]` does not
    /// parse: a matrix needs at least one row and one column to have a
    /// readable text form.
    pub fn from_text(text: &str) -> Result<Self> {
        let inner = text
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| {
                GridError::InvalidText("matrix text must be wrapped in `[` and `]`".into())
            })?;
        if inner.is_empty() {
            return Err(GridError::InvalidText("matrix text has no rows".into()));
        }
        let mut rows: Vec<Vec<T>> = Vec::new();
        for (index, row_text) in inner.split("\n ").enumerate() {
            let cells_text = row_text
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| {
                    GridError::InvalidText(format!("row {index} must be wrapped in `[` and `]`"))
                })?;
            let mut cells = Vec::new();
            for (cell_index, token) in cells_text.split(", ").enumerate() {
                let cell = parse_cell::<T>(token).map_err(|message| {
                    GridError::InvalidText(format!("row {index}, cell {cell_index}: {message}"))
                })?;
                cells.push(cell);
            }
            rows.push(cells);
        }
        Self::from_rows(rows)
    }
}

impl<T: CellText> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl<T: CellText> FromStr for DenseMatrix<T> {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}
