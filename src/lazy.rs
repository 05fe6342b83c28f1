//! Deferred query pipeline.
//!
//! A [`LazyMatrix`] is a handle to an immutable chain of query stages
//! over a borrowed source matrix. Each query wraps the chain in a new
//! stage and returns a new handle; the original handle stays valid, so
//! several pipelines can branch from one upstream chain and share it
//! referentially (stages are behind `Arc` and only ever point backward).
//!
//! Nothing executes until [`LazyMatrix::evaluate`]. Materialization
//! walks the chain depth-first: every stage materializes its parent(s)
//! and then fills its own output through the `gridq-kernel` engine under
//! the stage's execution mode. Results are never cached; each
//! `evaluate` re-reads the current state of the source matrix, which is
//! observable with interior-mutable cell types.
//!
//! Execution modes are inherited: a source stage runs in series, a
//! mode override ([`LazyMatrix::with_mode`], [`LazyMatrix::parallel_hint`])
//! applies to every stage added after it, and a zip takes its left
//! side's mode.

use std::fmt;
use std::sync::Arc;

use gridq_kernel::{fill_grid, ExecMode};

use crate::matrix::ensure_same_shape;
use crate::{DenseMatrix, GridError, Result};

/// One deferred step. `resolve` materializes the parent chain first and
/// then produces this stage's output.
trait Stage<T>: Send + Sync {
    fn mode(&self) -> ExecMode;
    fn resolve(&self) -> Result<DenseMatrix<T>>;
}

// ---- source ----

struct SourceStage<'a, T> {
    matrix: &'a DenseMatrix<T>,
}

impl<'a, T: Clone + Send + Sync> Stage<T> for SourceStage<'a, T> {
    fn mode(&self) -> ExecMode {
        ExecMode::Series
    }

    fn resolve(&self) -> Result<DenseMatrix<T>> {
        // Deep copy of the source as it is right now.
        Ok(self.matrix.clone())
    }
}

// ---- mode override ----

struct HintStage<'a, T> {
    inner: Arc<dyn Stage<T> + 'a>,
    mode: ExecMode,
}

impl<'a, T> Stage<T> for HintStage<'a, T> {
    fn mode(&self) -> ExecMode {
        self.mode
    }

    fn resolve(&self) -> Result<DenseMatrix<T>> {
        self.inner.resolve()
    }
}

// ---- map / fill ----

struct MapStage<'a, S, T> {
    inner: Arc<dyn Stage<S> + 'a>,
    f: Box<dyn Fn(&S, usize, usize) -> T + Send + Sync + 'a>,
}

impl<'a, S: Sync, T: Send> Stage<T> for MapStage<'a, S, T> {
    fn mode(&self) -> ExecMode {
        self.inner.mode()
    }

    fn resolve(&self) -> Result<DenseMatrix<T>> {
        let source = self.inner.resolve()?;
        let (rows, cols) = source.shape();
        let f = &self.f;
        let data = fill_grid(rows, cols, self.mode(), 1, |i, j| f(&source[(i, j)], i, j));
        Ok(DenseMatrix::from_parts(data, rows, cols))
    }
}

// ---- transpose ----

struct TransposeStage<'a, T> {
    inner: Arc<dyn Stage<T> + 'a>,
}

impl<'a, T: Clone + Send + Sync> Stage<T> for TransposeStage<'a, T> {
    fn mode(&self) -> ExecMode {
        self.inner.mode()
    }

    fn resolve(&self) -> Result<DenseMatrix<T>> {
        let source = self.inner.resolve()?;
        let (rows, cols) = source.shape();
        let data = fill_grid(cols, rows, self.mode(), 1, |i, j| source[(j, i)].clone());
        Ok(DenseMatrix::from_parts(data, cols, rows))
    }
}

// ---- zip ----

struct ZipStage<'a, L, R> {
    left: Arc<dyn Stage<L> + 'a>,
    right: Arc<dyn Stage<R> + 'a>,
}

impl<'a, L, R> Stage<(L, R)> for ZipStage<'a, L, R>
where
    L: Clone + Send + Sync,
    R: Clone + Send + Sync,
{
    fn mode(&self) -> ExecMode {
        self.left.mode()
    }

    fn resolve(&self) -> Result<DenseMatrix<(L, R)>> {
        let left = self.left.resolve()?;
        let right = self.right.resolve()?;
        ensure_same_shape(&left, &right)?;
        let (rows, cols) = left.shape();
        let data = fill_grid(rows, cols, self.mode(), 1, |i, j| {
            (left[(i, j)].clone(), right[(i, j)].clone())
        });
        Ok(DenseMatrix::from_parts(data, rows, cols))
    }
}

// ---- crop ----

#[derive(Clone, Copy)]
enum CropSpec {
    /// Inclusive corners fixed at query time.
    Rect {
        start: (usize, usize),
        end: (usize, usize),
    },
    /// One full row; its width resolves against the source shape at
    /// materialization.
    Row(usize),
    /// One full column; its height resolves likewise.
    Column(usize),
}

impl CropSpec {
    /// Resolve to `(origin, rows, cols)` against the source shape.
    fn resolve(self, rows: usize, cols: usize) -> Result<((usize, usize), usize, usize)> {
        match self {
            CropSpec::Rect { start, end } => {
                if end.0 >= rows || end.1 >= cols {
                    return Err(GridError::OutOfBounds {
                        row: end.0,
                        col: end.1,
                        rows,
                        cols,
                    });
                }
                Ok((start, end.0 - start.0 + 1, end.1 - start.1 + 1))
            }
            CropSpec::Row(index) => {
                if index >= rows {
                    return Err(GridError::OutOfBounds {
                        row: index,
                        col: 0,
                        rows,
                        cols,
                    });
                }
                Ok(((index, 0), 1, cols))
            }
            CropSpec::Column(index) => {
                if index >= cols {
                    return Err(GridError::OutOfBounds {
                        row: 0,
                        col: index,
                        rows,
                        cols,
                    });
                }
                Ok(((0, index), rows, 1))
            }
        }
    }
}

struct CropStage<'a, T> {
    inner: Arc<dyn Stage<T> + 'a>,
    spec: CropSpec,
}

impl<'a, T: Clone + Send + Sync> Stage<T> for CropStage<'a, T> {
    fn mode(&self) -> ExecMode {
        self.inner.mode()
    }

    fn resolve(&self) -> Result<DenseMatrix<T>> {
        let source = self.inner.resolve()?;
        let (src_rows, src_cols) = source.shape();
        let (origin, rows, cols) = self.spec.resolve(src_rows, src_cols)?;
        let data = fill_grid(rows, cols, self.mode(), 1, |i, j| {
            source[(origin.0 + i, origin.1 + j)].clone()
        });
        Ok(DenseMatrix::from_parts(data, rows, cols))
    }
}

// ---- public handle ----

/// A deferred query pipeline over a borrowed source matrix.
///
/// Handles are cheap to clone (the stage chain is shared, not copied)
/// and queries take `&self`, so a pipeline can be branched and
/// re-evaluated freely. See the module docs for the evaluation and
/// mode-inheritance rules.
pub struct LazyMatrix<'a, T> {
    stage: Arc<dyn Stage<T> + 'a>,
}

impl<'a, T> Clone for LazyMatrix<'a, T> {
    fn clone(&self) -> Self {
        Self {
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<'a, T> fmt::Debug for LazyMatrix<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyMatrix")
            .field("mode", &self.stage.mode())
            .finish_non_exhaustive()
    }
}

impl<'a, T: 'a> LazyMatrix<'a, T> {
    fn from_stage(stage: Arc<dyn Stage<T> + 'a>) -> Self {
        Self { stage }
    }

    /// The execution mode the newest stage runs under (inherited from
    /// upstream unless overridden).
    pub fn mode(&self) -> ExecMode {
        self.stage.mode()
    }

    /// Materialize the chain into a fresh matrix.
    ///
    /// Walks the stage chain depth-first with no caching: every call
    /// re-reads the current state of the source matrix. Shape and range
    /// violations that depend on materialized shapes surface here.
    pub fn evaluate(&self) -> Result<DenseMatrix<T>> {
        self.stage.resolve()
    }

    /// Pin the execution mode for the stages added after this call.
    pub fn with_mode(&self, mode: ExecMode) -> Self {
        Self::from_stage(Arc::new(HintStage {
            inner: Arc::clone(&self.stage),
            mode,
        }))
    }

    /// Parallelism hint: `force` pins [`ExecMode::Parallel`], otherwise
    /// the cost model chooses per fill ([`ExecMode::Auto`]). Like every
    /// mode override, it governs the stages added after it.
    pub fn parallel_hint(&self, force: bool) -> Self {
        self.with_mode(if force {
            ExecMode::Parallel
        } else {
            ExecMode::Auto
        })
    }

    /// Elementwise projection.
    pub fn map<U, F>(&self, f: F) -> LazyMatrix<'a, U>
    where
        T: Sync,
        U: Send + 'a,
        F: Fn(&T) -> U + Send + Sync + 'a,
    {
        self.map_indexed(move |value, _, _| f(value))
    }

    /// Elementwise projection that also sees the cell position.
    pub fn map_indexed<U, F>(&self, f: F) -> LazyMatrix<'a, U>
    where
        T: Sync,
        U: Send + 'a,
        F: Fn(&T, usize, usize) -> U + Send + Sync + 'a,
    {
        LazyMatrix::from_stage(Arc::new(MapStage {
            inner: Arc::clone(&self.stage),
            f: Box::new(f),
        }))
    }

    /// Position-driven regeneration: a same-shaped matrix whose cells
    /// come from `f(row, col)`, ignoring the current cell values.
    pub fn fill_with<F>(&self, f: F) -> Self
    where
        T: Send + Sync + 'a,
        F: Fn(usize, usize) -> T + Send + Sync + 'a,
    {
        self.map_indexed(move |_, i, j| f(i, j))
    }

    /// Deferred transpose: output `(j, i)` reads input `(i, j)`.
    pub fn transpose(&self) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::from_stage(Arc::new(TransposeStage {
            inner: Arc::clone(&self.stage),
        }))
    }

    /// Pair this pipeline with an equal-shaped one, cell by cell.
    ///
    /// The zipped stage carries the left (self) side's execution mode.
    /// Shape equality is checked when the zip materializes, against both
    /// materialized inputs.
    pub fn zip<U>(&self, other: &LazyMatrix<'a, U>) -> LazyMatrix<'a, (T, U)>
    where
        T: Clone + Send + Sync,
        U: Clone + Send + Sync + 'a,
    {
        LazyMatrix::from_stage(Arc::new(ZipStage {
            left: Arc::clone(&self.stage),
            right: Arc::clone(&other.stage),
        }))
    }

    /// Crop to the inclusive rectangle `start..=end`.
    ///
    /// Corner ordering is validated here; whether the corners fit the
    /// source is only known at materialization and surfaces there as an
    /// out-of-bounds error.
    pub fn sub_matrix(&self, start: (usize, usize), end: (usize, usize)) -> Result<Self>
    where
        T: Clone + Send + Sync,
    {
        if start.0 > end.0 || start.1 > end.1 {
            return Err(GridError::CropOrder { start, end });
        }
        Ok(Self::from_stage(Arc::new(CropStage {
            inner: Arc::clone(&self.stage),
            spec: CropSpec::Rect { start, end },
        })))
    }

    /// Crop to one full row.
    pub fn row(&self, index: usize) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::from_stage(Arc::new(CropStage {
            inner: Arc::clone(&self.stage),
            spec: CropSpec::Row(index),
        }))
    }

    /// Crop to one full column.
    pub fn column(&self, index: usize) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::from_stage(Arc::new(CropStage {
            inner: Arc::clone(&self.stage),
            spec: CropSpec::Column(index),
        }))
    }
}

impl<T> DenseMatrix<T> {
    /// Begin a deferred query pipeline borrowing this matrix.
    ///
    /// Construction copies no cells; the source is read when the
    /// pipeline materializes. The source stage runs in series until a
    /// mode override says otherwise.
    pub fn lazy(&self) -> LazyMatrix<'_, T>
    where
        T: Clone + Send + Sync,
    {
        LazyMatrix::from_stage(Arc::new(SourceStage { matrix: self }))
    }
}
