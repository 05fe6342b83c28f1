//! Contiguous partition policy for splitting an index space over workers.

use std::ops::Range;

use smallvec::SmallVec;

/// Stack-allocated partition list. 8 entries covers typical worker
/// counts without touching the heap.
pub type PartitionList = SmallVec<[Range<usize>; 8]>;

/// Split `0..len` into at most `workers` contiguous ranges.
///
/// Policy:
/// - `len == 0`: no partitions.
/// - `len < workers`: one unit range per element.
/// - otherwise: exactly `workers` chunks of `len / workers` elements,
///   with the division remainder folded into the last chunk.
///
/// The returned ranges are ascending, pairwise disjoint, and cover
/// `0..len` exactly. `workers` is a parameter rather than being read
/// from the pool here, so the policy can be exercised with a pinned
/// count.
pub fn partition(len: usize, workers: usize) -> PartitionList {
    let workers = workers.max(1);
    if len == 0 {
        return PartitionList::new();
    }
    if len < workers {
        return (0..len).map(|i| i..i + 1).collect();
    }
    let chunk = len / workers;
    let mut parts = PartitionList::with_capacity(workers);
    for w in 0..workers - 1 {
        parts.push(w * chunk..(w + 1) * chunk);
    }
    parts.push((workers - 1) * chunk..len);
    parts
}
