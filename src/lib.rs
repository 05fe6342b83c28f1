//! Deferred 2-D matrix queries with an adaptive series/parallel engine.
//!
//! `gridq` is built around three layers:
//!
//! - [`DenseMatrix`]: a generic, owned, row-major 2-D container with
//!   bounds-checked access, concatenation, and a fixed text format.
//! - [`LazyMatrix`]: a deferred query pipeline over a matrix. Queries
//!   (map, fill, transpose, zip, crop) build an immutable chain of
//!   stages; nothing executes until [`LazyMatrix::evaluate`], which
//!   walks the chain and produces a fresh matrix. Evaluation re-reads
//!   the source every time; there is no caching between evaluations.
//! - the execution engine (re-exported from `gridq-kernel`): every
//!   stage fills its output through a tri-state series/parallel/auto
//!   dispatcher with a fixed contiguous partition policy.
//!
//! # Core Types
//!
//! - [`DenseMatrix`]: owned row-major storage, `rows x columns`
//! - [`LazyMatrix`]: cheaply clonable handle to a deferred query chain
//! - [`ExecMode`]: `Series` / `Parallel` / `Auto` execution choice
//! - [`GridError`] / [`Result`]: error surface for every fallible call
//!
//! # Queries
//!
//! - [`LazyMatrix::map`] / [`LazyMatrix::map_indexed`]: elementwise
//!   projection, optionally position-aware
//! - [`LazyMatrix::fill_with`]: position-driven regeneration
//! - [`LazyMatrix::transpose`]: deferred transpose
//! - [`LazyMatrix::zip`]: pair two equal-shaped pipelines into tuples
//! - [`LazyMatrix::sub_matrix`] / [`LazyMatrix::row`] /
//!   [`LazyMatrix::column`]: rectangular crops
//! - [`LazyMatrix::with_mode`] / [`LazyMatrix::parallel_hint`]: execution
//!   mode for the stages added downstream
//!
//! # Arithmetic
//!
//! One generic implementation over the [`Scalar`] capability serves every
//! numeric element type: checked [`add`]/[`sub`]/[`mul`]/[`scale`]
//! functions returning [`Result`], plus `+`, `-`, `*` operators and the
//! `|`/`&` concatenation operators on `&DenseMatrix`.
//!
//! # Example
//!
//! ```rust
//! use gridq::DenseMatrix;
//!
//! let m = DenseMatrix::from_rows(vec![
//!     vec![1, 2],
//!     vec![3, 4],
//! ]).unwrap();
//!
//! // Queries build a deferred chain; nothing runs until `evaluate`.
//! let doubled = m.lazy().transpose().map(|x| x * 2).evaluate().unwrap();
//! assert_eq!(doubled[(0, 1)], 6);
//!
//! // Numeric operators run through the same engine.
//! let sum = &m + &m;
//! assert_eq!(sum[(1, 1)], 8);
//!
//! // The text format round-trips.
//! let parsed: DenseMatrix<i64> = "[[1, 2]\n [3, 4]]".parse().unwrap();
//! assert_eq!(parsed.to_text(), "[[1, 2]\n [3, 4]]");
//! ```

mod lazy;
mod matrix;
mod ops;
mod text;

// ============================================================================
// Core types
// ============================================================================
pub use lazy::LazyMatrix;
pub use matrix::DenseMatrix;

// ============================================================================
// Arithmetic
// ============================================================================
pub use ops::{add, mul, scale, sub};

// ============================================================================
// Engine re-exports
// ============================================================================
pub use gridq_kernel::{
    fill_flat, fill_grid, partition, should_parallelize, worker_count, ExecMode, PartitionList,
    AUTO_COST_THRESHOLD,
};

// ============================================================================
// Element capability re-exports
// ============================================================================
pub use gridq_traits::{CellText, Scalar};

// ============================================================================
// Error types
// ============================================================================

/// Errors surfaced by matrix construction, access, queries, and the text
/// format.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Operand shapes are incompatible for the requested operation
    /// (elementwise arithmetic, zip, concatenation, or a matrix product
    /// whose inner dimensions disagree).
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A cell position outside the matrix.
    #[error("position ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Crop corners out of order (`start` must not exceed `end` on
    /// either axis).
    #[error("crop start {start:?} exceeds end {end:?}")]
    CropOrder {
        start: (usize, usize),
        end: (usize, usize),
    },

    /// Flattening requires a single-row or single-column matrix.
    #[error("matrix is {rows}x{cols}, expected a single row or column")]
    NotVector { rows: usize, cols: usize },

    /// Flat buffer length does not match the requested shape.
    #[error("buffer of {len} elements cannot form a {rows}x{cols} matrix")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        len: usize,
    },

    /// 2-D input rows of differing widths.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Malformed matrix text.
    #[error("invalid matrix text: {0}")]
    InvalidText(String),
}

/// Result type for gridq operations.
pub type Result<T> = std::result::Result<T, GridError>;
