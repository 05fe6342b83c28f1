//! Adaptive series/parallel fill engine for dense row-major buffers.
//!
//! This crate is the execution layer under the `gridq` matrix pipeline.
//! It knows nothing about matrices; it fills flat or 2-D row-major
//! buffers from a per-cell producer under one of three modes:
//!
//! - [`ExecMode::Series`]: ascending row-major iteration on the caller
//!   thread.
//! - [`ExecMode::Parallel`]: the index space is split into at most
//!   [`worker_count`] contiguous partitions, one rayon task per
//!   partition, joined with a full barrier before the buffer is
//!   returned. Tasks write disjoint ranges of the single output buffer,
//!   so no locks are taken.
//! - [`ExecMode::Auto`]: picks between the two by comparing
//!   `cells * cost` against [`AUTO_COST_THRESHOLD`].
//!
//! The partition policy ([`partition`]) is part of the contract: callers
//! can rely on partitions being contiguous, pairwise disjoint, ascending,
//! and covering the index space exactly.

mod fill;
mod partition;

pub use fill::{fill_flat, fill_grid};
pub use partition::{partition, PartitionList};

/// Execution mode for a fill.
///
/// `Auto` defers the series/parallel choice to the cost model at dispatch
/// time; the other two force a strategy regardless of size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Choose series or parallel from `cells * cost` at dispatch time.
    #[default]
    Auto,
    /// Always fill on the caller thread, ascending row-major.
    Series,
    /// Always fork-join over partitions, even for tiny inputs.
    Parallel,
}

/// Total-cost threshold for the automatic mode. Fills whose
/// `cells * cost` product lands below this run in series; everything
/// else is dispatched to the parallel path.
pub const AUTO_COST_THRESHOLD: usize = 10_000;

/// The automatic series/parallel decision.
///
/// `cost` is a per-cell work multiplier; elementwise steps use 1, the
/// matrix product passes its inner length so that a small output with a
/// deep accumulation still crosses the threshold.
#[inline]
pub fn should_parallelize(cells: usize, cost: usize) -> bool {
    cells.saturating_mul(cost) >= AUTO_COST_THRESHOLD
}

/// Number of workers available to parallel fills: the size of the
/// process-wide rayon pool, read at each dispatch.
#[inline]
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}
