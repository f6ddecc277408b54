//! Insert and query key streams for the search benchmark.
//!
//! Insert keys come from one seeded generator and queries from another, so a
//! query phase never depends on replaying the insert phase.

use serde::Serialize;

use crate::rng::RandomSource;

/// Insert keys are drawn from `[0, KEY_SPREAD * n)`; misses from the band
/// just above it.
pub const KEY_SPREAD: i64 = 10;

/// `n` keys drawn uniformly from `[0, 10 n)`. Duplicates are likely.
pub fn insert_keys<R: RandomSource>(n: usize, rng: &mut R) -> Vec<i64> {
    let bound = upper(n);
    return (0..n).map(|_| rng.index_in(0, bound as usize - 1) as i64).collect();
}

fn upper(n: usize) -> i64 {
    return (n.max(1) as i64) * KEY_SPREAD;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Query {
    pub key: i64,
    /// Whether the key was taken from the inserted set.
    pub expect_hit: bool,
}

/// Queries against `keys`: each one is, with probability `hit_ratio`, a
/// uniformly chosen inserted key, and otherwise a key from `[10 n, 20 n)`,
/// which no insert can produce.
pub struct QueryStream<'a, R> {
    keys: &'a [i64],
    hit_ratio: f64,
    rng: R,
}

impl<'a, R: RandomSource> QueryStream<'a, R> {
    pub fn new(keys: &'a [i64], hit_ratio: f64, rng: R) -> QueryStream<'a, R> {
        return QueryStream { keys, hit_ratio: hit_ratio.clamp(0.0, 1.0), rng };
    }
}

impl<R: RandomSource> Iterator for QueryStream<'_, R> {
    type Item = Query;

    fn next(&mut self) -> Option<Query> {
        if !self.keys.is_empty() && self.rng.coin(self.hit_ratio) {
            let key = self.keys[self.rng.index_in(0, self.keys.len() - 1)];
            return Some(Query { key, expect_hit: true });
        }
        let lo = upper(self.keys.len());
        let key = lo + self.rng.index_in(0, lo as usize - 1) as i64;
        return Some(Query { key, expect_hit: false });
    }
}
