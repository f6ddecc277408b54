//! Randomized Hoare partitioning, quickselect and quicksort over `u32` words.
//!
//! All three work in place on a `&mut [u32]`. The harness hands them the view
//! of a `MappedBuffer`, so every read and swap goes through the mapped file,
//! but they run just as well on a heap slice.
//!
//! Ranges are closed: `[low, high]`.

use crate::error::{Error, Result};
use crate::rng::RandomSource;

fn check_range(len: usize, low: usize, high: usize) -> Result<()> {
    if len == 0 || low > high {
        return Err(Error::EmptyRange);
    }
    if high >= len {
        return Err(Error::IndexOutOfRange { index: high, low: 0, high: len - 1 });
    }
    return Ok(());
}

/// Partition `data[low..=high]` around a randomly chosen pivot and return the
/// split point `p`: afterwards every element of `[low, p]` is `<=` every
/// element of `[p + 1, high]`.
pub fn partition<R: RandomSource>(data: &mut [u32], low: usize, high: usize, rng: &mut R) -> Result<usize> {
    check_range(data.len(), low, high)?;
    return Ok(partition_unchecked(data, low, high, rng));
}

/// Hoare partition. The pivot is moved to `low` first, which keeps the
/// returned split strictly below `high` whenever the range has two or more
/// elements, so callers always shrink the range.
fn partition_unchecked<R: RandomSource>(data: &mut [u32], low: usize, high: usize, rng: &mut R) -> usize {
    let pivot_idx = rng.index_in(low, high);
    data.swap(low, pivot_idx);
    let pivot = data[low];

    let mut i = low;
    let mut j = high;
    loop {
        while data[i] < pivot {
            i += 1;
        }
        while data[j] > pivot {
            j -= 1;
        }
        if i >= j {
            return j;
        }
        data.swap(i, j);
        i += 1;
        j -= 1;
    }
}

/// Return the element that would sit at index `k` if `data[low..=high]` were
/// sorted. `k` is an absolute index inside `[low, high]`.
///
/// The range is reordered in place.
pub fn select<R: RandomSource>(data: &mut [u32], low: usize, high: usize, k: usize, rng: &mut R) -> Result<u32> {
    check_range(data.len(), low, high)?;
    if k < low || k > high {
        return Err(Error::IndexOutOfRange { index: k, low, high });
    }

    let (mut low, mut high) = (low, high);
    while low < high {
        let p = partition_unchecked(data, low, high, rng);
        if k <= p {
            high = p;
        } else {
            low = p + 1;
        }
    }
    return Ok(data[low]);
}

/// Sort `data[low..=high]` in place, non-decreasing.
pub fn sort<R: RandomSource>(data: &mut [u32], low: usize, high: usize, rng: &mut R) -> Result<()> {
    check_range(data.len(), low, high)?;
    sort_unchecked(data, low, high, rng);
    return Ok(());
}

/// Recurse into the smaller side and loop on the larger, so the stack stays
/// O(log n) deep even when the pivots are unlucky.
fn sort_unchecked<R: RandomSource>(data: &mut [u32], mut low: usize, mut high: usize, rng: &mut R) {
    while low < high {
        let p = partition_unchecked(data, low, high, rng);
        if p - low < high - p {
            sort_unchecked(data, low, p, rng);
            low = p + 1;
        } else {
            sort_unchecked(data, p + 1, high, rng);
            high = p;
        }
    }
}
