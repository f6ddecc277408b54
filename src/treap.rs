//! Treap: a binary search tree balanced by random priorities.
//!
//! Keys obey BST order (duplicates go right), priorities obey max-heap order.
//! Since priorities are independent uniform draws, the expected height is
//! O(log n) without any balance bookkeeping.
//!
//! ```text
//!            (50, 0.97)
//!           /          \
//!     (20, 0.61)    (80, 0.88)
//!          \            /
//!       (30, 0.12) (80, 0.40)
//! ```
//!
//! Nodes live in an arena and refer to their children by index, so the tree
//! never holds raw pointers and is dropped in one deallocation.

use crate::error::Result;
use crate::rng::RandomSource;
use crate::search::{SearchEngine, SearchResult};

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// Null index marker.
const NULL: Idx = Idx::MAX;

struct Node {
    key: i64,
    priority: f32,
    left: Idx,
    right: Idx,
}

/// A treap over `i64` keys.
pub struct Treap {
    nodes: Vec<Node>,
    root: Idx,
}

impl Treap {
    pub fn new() -> Treap {
        return Treap { nodes: Vec::new(), root: NULL };
    }

    pub fn len(&self) -> usize {
        return self.nodes.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.nodes.is_empty();
    }

    fn node(&self, idx: Idx) -> &Node {
        return &self.nodes[idx as usize];
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node {
        return &mut self.nodes[idx as usize];
    }

    /// Insert `key`, drawing its priority from `rng`.
    ///
    /// Fails with `OutOfMemory` before touching the tree if the arena cannot
    /// grow.
    pub fn insert<R: RandomSource>(&mut self, key: i64, rng: &mut R) -> Result<()> {
        self.nodes.try_reserve(1)?;
        let priority = rng.unit_f32();
        self.root = self.insert_at(self.root, key, priority);
        return Ok(());
    }

    /// Insert below `root` and return the new subtree root.
    fn insert_at(&mut self, root: Idx, key: i64, priority: f32) -> Idx {
        if root == NULL {
            let idx = self.nodes.len() as Idx;
            self.nodes.push(Node { key, priority, left: NULL, right: NULL });
            return idx;
        }

        if key < self.node(root).key {
            let left = self.insert_at(self.node(root).left, key, priority);
            self.node_mut(root).left = left;
            if self.node(left).priority > self.node(root).priority {
                return self.rotate_right(root);
            }
        } else {
            let right = self.insert_at(self.node(root).right, key, priority);
            self.node_mut(root).right = right;
            if self.node(right).priority > self.node(root).priority {
                return self.rotate_left(root);
            }
        }
        return root;
    }

    /// Lift the left child of `root` above it.
    fn rotate_right(&mut self, root: Idx) -> Idx {
        let new_root = self.node(root).left;
        self.node_mut(root).left = self.node(new_root).right;
        self.node_mut(new_root).right = root;
        return new_root;
    }

    /// Lift the right child of `root` above it.
    fn rotate_left(&mut self, root: Idx) -> Idx {
        let new_root = self.node(root).right;
        self.node_mut(root).right = self.node(new_root).left;
        self.node_mut(new_root).left = root;
        return new_root;
    }

    pub fn search(&self, key: i64) -> SearchResult {
        return self.search_from(key, 0);
    }

    /// Search starting the step counter at `steps`.
    ///
    /// Each visited node counts once, including the matching one. Equal keys
    /// are looked for on the right, the same side insertion puts them.
    pub fn search_from(&self, key: i64, mut steps: u64) -> SearchResult {
        let mut current = self.root;
        while current != NULL {
            steps += 1;
            let node = self.node(current);
            if key == node.key {
                return SearchResult::hit(steps);
            }
            current = if key < node.key { node.left } else { node.right };
        }
        return SearchResult::miss(steps);
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = Vec::new();
        if self.root != NULL {
            stack.push((self.root, 1));
        }
        while let Some((idx, depth)) = stack.pop() {
            max = max.max(depth);
            let node = self.node(idx);
            if node.left != NULL {
                stack.push((node.left, depth + 1));
            }
            if node.right != NULL {
                stack.push((node.right, depth + 1));
            }
        }
        return max;
    }

    /// In-order keys, non-decreasing.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { treap: self, stack: Vec::new() };
        iter.push_left(self.root);
        return iter;
    }

    /// Verify heap order on priorities and BST order on keys.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (idx, node) in self.nodes.iter().enumerate() {
            for child in [node.left, node.right] {
                if child != NULL && self.node(child).priority > node.priority {
                    return Err(format!(
                        "node {} (key {}, priority {}) has child {} with priority {}",
                        idx,
                        node.key,
                        node.priority,
                        child,
                        self.node(child).priority
                    ));
                }
            }
        }

        let mut prev: Option<i64> = None;
        let mut count = 0;
        for key in self.iter() {
            if let Some(p) = prev {
                if key < p {
                    return Err(format!("in-order keys decrease: {} then {}", p, key));
                }
            }
            prev = Some(key);
            count += 1;
        }
        if count != self.nodes.len() {
            return Err(format!("reachable nodes {} != arena size {}", count, self.nodes.len()));
        }
        return Ok(());
    }
}

impl Default for Treap {
    fn default() -> Self {
        return Self::new();
    }
}

impl SearchEngine for Treap {
    fn name(&self) -> &'static str {
        return "treap";
    }

    fn insert<R: RandomSource>(&mut self, key: i64, rng: &mut R) -> Result<bool> {
        Treap::insert(self, key, rng)?;
        return Ok(true);
    }

    fn search(&self, key: i64) -> SearchResult {
        return Treap::search(self, key);
    }

    fn len(&self) -> usize {
        return Treap::len(self);
    }
}

/// In-order iterator over treap keys.
pub struct Iter<'a> {
    treap: &'a Treap,
    stack: Vec<Idx>,
}

impl Iter<'_> {
    fn push_left(&mut self, mut idx: Idx) {
        while idx != NULL {
            self.stack.push(idx);
            idx = self.treap.node(idx).left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let idx = self.stack.pop()?;
        let node = self.treap.node(idx);
        self.push_left(node.right);
        return Some(node.key);
    }
}
