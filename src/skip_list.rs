//! Skip list over `i64` values with configurable level growth.
//!
//! Every node participates in lanes `0..height`. Heights are drawn when the
//! node is inserted: start at 1 and keep growing with probability `p` up to
//! the configured cap. Lane 0 holds every value; each lane above it holds
//! roughly a fraction `p` of the lane below.
//!
//! ```text
//! Lane 2: HEAD ----------------> 40 ------------------> NULL
//! Lane 1: HEAD ------> 17 -----> 40 --------> 73 -----> NULL
//! Lane 0: HEAD -> 5 -> 17 -> 23 -> 40 -> 61 -> 73 -> 90 -> NULL
//! ```
//!
//! # Layout
//!
//! Nodes live in an arena; forward links for all nodes share one flat `links`
//! vector and each node records where its run of `height` links starts. The
//! header is node 0, always `max_level` tall, holding `i64::MIN`.

use smallvec::SmallVec;
use smallvec::smallvec;

use crate::error::{Error, Result};
use crate::rng::RandomSource;
use crate::search::{SearchEngine, SearchResult};

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// Null index marker.
const NULL: Idx = Idx::MAX;

/// Index of the header node.
const HEAD: Idx = 0;

/// Hard upper bound on `max_level`.
pub const MAX_LEVEL: usize = 64;

/// Tuning knobs for level generation.
///
/// Only built through [`SkipListConfig::new`], [`SkipListConfig::for_size`]
/// or `Default`, so a list never sees a cap outside `1..=MAX_LEVEL` or a
/// probability outside `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListConfig {
    /// Number of lanes available; node heights never exceed this.
    max_level: usize,
    /// Probability of growing one more level.
    promote_probability: f64,
}

impl SkipListConfig {
    /// Fair coin, one lane per doubling.
    pub const HALF: f64 = 0.5;
    /// Sparser upper lanes, fewer links per node.
    pub const QUARTER: f64 = 0.25;

    pub fn new(max_level: usize, promote_probability: f64) -> Result<SkipListConfig> {
        if max_level == 0 || max_level > MAX_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL, max_level
            )));
        }
        if !(promote_probability > 0.0 && promote_probability < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "promote_probability must be in (0, 1), got {}",
                promote_probability
            )));
        }
        return Ok(SkipListConfig { max_level, promote_probability });
    }

    /// Cap the level at `floor(log2(n)) + 1` for an expected `n` values.
    pub fn for_size(n: usize, promote_probability: f64) -> Result<SkipListConfig> {
        return SkipListConfig::new(level_for_size(n), promote_probability);
    }

    pub fn max_level(&self) -> usize {
        return self.max_level;
    }

    pub fn promote_probability(&self) -> f64 {
        return self.promote_probability;
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        return SkipListConfig { max_level: 16, promote_probability: SkipListConfig::HALF };
    }
}

/// `floor(log2(n)) + 1`, and 1 for an empty set.
pub fn level_for_size(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    return (usize::BITS - n.leading_zeros()) as usize;
}

struct Node {
    value: i64,
    /// Offset of this node's first link in `SkipList::links`.
    links: usize,
    height: u8,
}

pub struct SkipList {
    config: SkipListConfig,
    nodes: Vec<Node>,
    links: Vec<Idx>,
    /// Number of lanes currently in use. Never decreases.
    level: usize,
}

impl SkipList {
    /// An empty list: just the header, one active lane.
    pub fn new(config: SkipListConfig) -> SkipList {
        let header = Node { value: i64::MIN, links: 0, height: config.max_level as u8 };
        return SkipList {
            config,
            nodes: vec![header],
            links: vec![NULL; config.max_level],
            level: 1,
        };
    }

    /// Number of values stored, not counting the header.
    pub fn len(&self) -> usize {
        return self.nodes.len() - 1;
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Number of active lanes.
    pub fn level(&self) -> usize {
        return self.level;
    }

    fn next(&self, idx: Idx, lane: usize) -> Idx {
        let node = &self.nodes[idx as usize];
        debug_assert!(lane < node.height as usize);
        return self.links[node.links + lane];
    }

    fn set_next(&mut self, idx: Idx, lane: usize, to: Idx) {
        let at = self.nodes[idx as usize].links + lane;
        self.links[at] = to;
    }

    fn value(&self, idx: Idx) -> i64 {
        return self.nodes[idx as usize].value;
    }

    fn random_level<R: RandomSource>(&self, rng: &mut R) -> usize {
        let mut level = 1;
        while level < self.config.max_level && rng.coin(self.config.promote_probability) {
            level += 1;
        }
        return level;
    }

    /// Insert `value`. Returns `false` if it was already present, in which
    /// case nothing changes and no level is drawn.
    pub fn insert<R: RandomSource>(&mut self, value: i64, rng: &mut R) -> Result<bool> {
        // Lanes above the current level start from the header.
        let mut update: SmallVec<[Idx; 32]> = smallvec![HEAD; self.config.max_level];
        let mut current = HEAD;
        for lane in (0..self.level).rev() {
            loop {
                let next = self.next(current, lane);
                if next != NULL && self.value(next) < value {
                    current = next;
                } else {
                    break;
                }
            }
            update[lane] = current;
        }

        let successor = self.next(current, 0);
        if successor != NULL && self.value(successor) == value {
            return Ok(false);
        }

        let height = self.random_level(rng);
        self.nodes.try_reserve(1)?;
        self.links.try_reserve(height)?;

        if height > self.level {
            for slot in update.iter_mut().take(height).skip(self.level) {
                *slot = HEAD;
            }
            self.level = height;
        }

        let idx = self.nodes.len() as Idx;
        let offset = self.links.len();
        self.links.extend(std::iter::repeat_n(NULL, height));
        self.nodes.push(Node { value, links: offset, height: height as u8 });

        for (lane, &pred) in update.iter().enumerate().take(height) {
            let succ = self.next(pred, lane);
            self.set_next(idx, lane, succ);
            self.set_next(pred, lane, idx);
        }
        return Ok(true);
    }

    /// Top-down search, one step per forward move.
    ///
    /// Stops as soon as a move lands on `value`; otherwise the result is a
    /// miss carrying the steps taken across all lanes.
    pub fn search(&self, value: i64) -> SearchResult {
        let mut steps = 0;
        let mut current = HEAD;
        for lane in (0..self.level).rev() {
            loop {
                let next = self.next(current, lane);
                if next == NULL || self.value(next) > value {
                    break;
                }
                current = next;
                steps += 1;
                if self.value(current) == value {
                    return SearchResult::hit(steps);
                }
            }
        }
        return SearchResult::miss(steps);
    }

    /// Values along one lane, in link order.
    pub fn lane(&self, lane: usize) -> Lane<'_> {
        let next = if lane < self.config.max_level { self.next(HEAD, lane) } else { NULL };
        return Lane { list: self, lane, next };
    }

    /// All values in ascending order.
    pub fn iter(&self) -> Lane<'_> {
        return self.lane(0);
    }

    /// How many nodes sit in each active lane, bottom first.
    pub fn lane_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.level];
        for node in &self.nodes[1..] {
            for count in counts.iter_mut().take(node.height as usize) {
                *count += 1;
            }
        }
        return counts;
    }

    /// Verify lane ordering and that each lane is a subset of the one below.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut below: Option<Vec<Idx>> = None;
        for lane in 0..self.config.max_level {
            let mut members = Vec::new();
            let mut idx = self.next(HEAD, lane);
            let mut prev = i64::MIN;
            let mut first = true;
            while idx != NULL {
                let value = self.value(idx);
                if !first && value <= prev {
                    return Err(format!("lane {}: {} follows {}", lane, value, prev));
                }
                if (self.nodes[idx as usize].height as usize) <= lane {
                    return Err(format!("lane {}: node {} is only {} tall", lane, idx, self.nodes[idx as usize].height));
                }
                members.push(idx);
                prev = value;
                first = false;
                idx = self.next(idx, lane);
            }

            if lane >= self.level && !members.is_empty() {
                return Err(format!("lane {} is above level {} but not empty", lane, self.level));
            }
            if let Some(lower) = &below {
                // Both lanes are sorted by value, so membership is a merge walk.
                let mut j = 0;
                for idx in &members {
                    while j < lower.len() && lower[j] != *idx {
                        j += 1;
                    }
                    if j == lower.len() {
                        return Err(format!("node {} in lane {} missing from lane {}", idx, lane, lane - 1));
                    }
                }
            } else if members.len() != self.len() {
                return Err(format!("lane 0 has {} nodes, list has {}", members.len(), self.len()));
            }
            below = Some(members);
        }
        return Ok(());
    }
}

impl SearchEngine for SkipList {
    fn name(&self) -> &'static str {
        return "skip_list";
    }

    fn insert<R: RandomSource>(&mut self, key: i64, rng: &mut R) -> Result<bool> {
        return SkipList::insert(self, key, rng);
    }

    fn search(&self, key: i64) -> SearchResult {
        return SkipList::search(self, key);
    }

    fn len(&self) -> usize {
        return SkipList::len(self);
    }
}

/// Iterator over the values of one lane.
pub struct Lane<'a> {
    list: &'a SkipList,
    lane: usize,
    next: Idx,
}

impl Iterator for Lane<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.next == NULL {
            return None;
        }
        let value = self.list.value(self.next);
        self.next = self.list.next(self.next, self.lane);
        return Some(value);
    }
}
