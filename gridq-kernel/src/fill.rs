//! Series and parallel buffer fills.
//!
//! Both entry points produce a fully initialized row-major `Vec<T>` from
//! a pure per-cell producer. The parallel path allocates the output as
//! `Vec<MaybeUninit<T>>`, spawns one task per partition inside a
//! `rayon::scope` (the scope exit is the join barrier), and lets each
//! task write its disjoint slots through a raw pointer.
//!
//! A panicking producer unwinds across the join: rayon waits for the
//! remaining tasks, then re-raises the panic on the caller thread. The
//! partially written buffer is dropped as `MaybeUninit`, which runs no
//! destructors, so partial results are never observable (cells already
//! produced leak, but only on the panic path).

use std::mem::{ManuallyDrop, MaybeUninit};

use crate::partition::partition;
use crate::{should_parallelize, worker_count, ExecMode};

/// A raw pointer wrapper that is `Send` + `Sync`.
///
/// # Safety
/// The caller must guarantee that the pointed-to buffer outlives every
/// parallel task and that tasks write pairwise disjoint slots.
struct SendPtr<T>(*mut T);

impl<T> Clone for SendPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SendPtr<T> {}

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    fn as_ptr(self) -> *mut T {
        self.0
    }
}

/// Fill a flat buffer of `len` cells from `producer`.
///
/// Series order is ascending. Parallel partitions follow [`partition`]
/// over `len` with the current [`worker_count`]; each partition fills
/// its range in ascending order.
pub fn fill_flat<T, F>(len: usize, mode: ExecMode, cost: usize, producer: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    match mode {
        ExecMode::Series => series_flat(len, &producer),
        ExecMode::Parallel => parallel_flat(len, &producer),
        ExecMode::Auto => {
            if should_parallelize(len, cost) {
                parallel_flat(len, &producer)
            } else {
                series_flat(len, &producer)
            }
        }
    }
}

/// Fill a `rows x cols` row-major buffer from `producer`.
///
/// Series order is row-major ascending. The parallel path bands the
/// larger axis (rows when `rows >= cols`, otherwise columns) so a
/// skewed shape still spreads over the pool; each band fills its cells
/// in row-major order within the band.
pub fn fill_grid<T, F>(rows: usize, cols: usize, mode: ExecMode, cost: usize, producer: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync,
{
    match mode {
        ExecMode::Series => series_grid(rows, cols, &producer),
        ExecMode::Parallel => parallel_grid(rows, cols, &producer),
        ExecMode::Auto => {
            if should_parallelize(rows * cols, cost) {
                parallel_grid(rows, cols, &producer)
            } else {
                series_grid(rows, cols, &producer)
            }
        }
    }
}

fn series_flat<T, F>(len: usize, producer: &F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..len).map(producer).collect()
}

fn series_grid<T, F>(rows: usize, cols: usize, producer: &F) -> Vec<T>
where
    F: Fn(usize, usize) -> T,
{
    let mut out = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            out.push(producer(i, j));
        }
    }
    out
}

fn parallel_flat<T, F>(len: usize, producer: &F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let mut buf: Vec<MaybeUninit<T>> = Vec::with_capacity(len);
    // SAFETY: MaybeUninit slots require no initialization.
    unsafe { buf.set_len(len) };
    let base = SendPtr(buf.as_mut_ptr());
    rayon::scope(|s| {
        for range in partition(len, worker_count()) {
            s.spawn(move |_| {
                let ptr = base.as_ptr();
                for idx in range {
                    // SAFETY: ranges are pairwise disjoint, so no slot is
                    // written by two tasks; `buf` outlives the scope.
                    unsafe { (*ptr.add(idx)).write(producer(idx)) };
                }
            });
        }
    });
    // SAFETY: the partitions cover 0..len, so every slot was written by
    // exactly one joined task.
    unsafe { assume_init_vec(buf) }
}

fn parallel_grid<T, F>(rows: usize, cols: usize, producer: &F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, usize) -> T + Sync,
{
    let cells = rows * cols;
    let mut buf: Vec<MaybeUninit<T>> = Vec::with_capacity(cells);
    // SAFETY: MaybeUninit slots require no initialization.
    unsafe { buf.set_len(cells) };
    let base = SendPtr(buf.as_mut_ptr());
    let workers = worker_count();
    rayon::scope(|s| {
        if rows >= cols {
            // Row bands: each band is a contiguous run of the flat buffer.
            for band in partition(rows, workers) {
                s.spawn(move |_| {
                    let ptr = base.as_ptr();
                    for i in band {
                        for j in 0..cols {
                            // SAFETY: row bands are disjoint, so cell
                            // (i, j) belongs to exactly one task.
                            unsafe { (*ptr.add(i * cols + j)).write(producer(i, j)) };
                        }
                    }
                });
            }
        } else {
            // Column bands: each task sweeps every row over its columns.
            for band in partition(cols, workers) {
                s.spawn(move |_| {
                    let ptr = base.as_ptr();
                    for i in 0..rows {
                        for j in band.clone() {
                            // SAFETY: column bands are disjoint, so cell
                            // (i, j) belongs to exactly one task.
                            unsafe { (*ptr.add(i * cols + j)).write(producer(i, j)) };
                        }
                    }
                });
            }
        }
    });
    // SAFETY: the bands cover every (i, j), so every slot was written by
    // exactly one joined task.
    unsafe { assume_init_vec(buf) }
}

/// Reinterpret a fully initialized `Vec<MaybeUninit<T>>` as `Vec<T>`.
///
/// # Safety
/// Every slot must have been initialized.
unsafe fn assume_init_vec<T>(buf: Vec<MaybeUninit<T>>) -> Vec<T> {
    let mut buf = ManuallyDrop::new(buf);
    let (ptr, len, cap) = (buf.as_mut_ptr(), buf.len(), buf.capacity());
    // SAFETY: MaybeUninit<T> has the same layout as T; ownership of the
    // allocation moves into the new Vec.
    unsafe { Vec::from_raw_parts(ptr.cast::<T>(), len, cap) }
}
