//! Search results and the interface shared by the in-memory engines.

use serde::Serialize;

use crate::error::Result;
use crate::rng::RandomSource;

/// Outcome of one search: whether the key was found and how many node or
/// lane visits it took to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SearchResult {
    pub found: bool,
    pub steps: u64,
}

impl SearchResult {
    pub fn hit(steps: u64) -> SearchResult {
        return SearchResult { found: true, steps };
    }

    pub fn miss(steps: u64) -> SearchResult {
        return SearchResult { found: false, steps };
    }
}

/// An ordered integer-keyed structure that counts its search steps.
///
/// Implemented by `Treap` and `SkipList` so the harness can drive both with
/// the same workload.
pub trait SearchEngine {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Insert a key. Returns `false` if the engine already held it and
    /// chose not to store another copy.
    fn insert<R: RandomSource>(&mut self, key: i64, rng: &mut R) -> Result<bool>;

    /// Look up a key, counting visits.
    fn search(&self, key: i64) -> SearchResult;

    /// Number of stored keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }
}
