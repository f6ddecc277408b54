//! Randomness and pivot source.
//!
//! Every engine takes its randomness explicitly. Anything implementing
//! `rand_core::RngCore` is a `RandomSource`, so tests and benchmarks pass a
//! seeded `StdRng` and get reproducible structures.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_core::RngCore;

/// Uniform draws used by the engines.
pub trait RandomSource {
    /// A float in `[0, 1)`, used for treap priorities.
    fn unit_f32(&mut self) -> f32;

    /// `true` with probability `p`, used for skip list level growth.
    fn coin(&mut self, p: f64) -> bool;

    /// A uniform index in the closed range `[low, high]`, used for pivots.
    fn index_in(&mut self, low: usize, high: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn unit_f32(&mut self) -> f32 {
        return self.r#gen::<f32>();
    }

    fn coin(&mut self, p: f64) -> bool {
        return self.gen_bool(p);
    }

    fn index_in(&mut self, low: usize, high: usize) -> usize {
        debug_assert!(low <= high);
        return self.gen_range(low..=high);
    }
}

/// Independent streams derived from one base seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    InsertKeys,
    QueryKeys,
    Priorities,
    Levels,
    Pivots,
    Dataset,
}

impl Stream {
    fn salt(self) -> u64 {
        return match self {
            Stream::InsertKeys => 1,
            Stream::QueryKeys => 2,
            Stream::Priorities => 3,
            Stream::Levels => 4,
            Stream::Pivots => 5,
            Stream::Dataset => 6,
        };
    }
}

/// Derive the seed for one stream, mixed with splitmix64 so that nearby base
/// seeds do not produce correlated streams.
pub fn derive_seed(base: u64, stream: Stream, size: usize) -> u64 {
    let mut z = base
        .wrapping_add(stream.salt().wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add((size as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    return z ^ (z >> 31);
}

/// A seeded generator for one stream.
pub fn stream_rng(base: u64, stream: Stream, size: usize) -> StdRng {
    return StdRng::seed_from_u64(derive_seed(base, stream, size));
}
