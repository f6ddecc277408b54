//! Searchbench - treaps, skip lists and external quickselect, side by side.
//!
//! Three independent engines, measured against the same workload shapes:
//!
//! | Engine | Balanced by | Measured as |
//! |--------|-------------|-------------|
//! | `Treap` | random priorities + rotations | search steps |
//! | `SkipList` | random node heights | search steps |
//! | `external::{select, sort}` | random pivots | wall-clock time over a mapped file |
//!
//! All randomness is passed in explicitly, so a seeded `StdRng` reproduces a
//! structure exactly.
//!
//! # Quick Start
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use searchbench::{SkipList, SkipListConfig, Treap};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut treap = Treap::new();
//! let mut list = SkipList::new(SkipListConfig::default());
//! for key in [5, 3, 8, 1, 4] {
//!     treap.insert(key, &mut rng)?;
//!     list.insert(key, &mut rng)?;
//! }
//! assert!(treap.search(4).found);
//! assert!(!list.search(99).found);
//! # Ok::<(), searchbench::Error>(())
//! ```

pub mod config;
pub mod dataset;
mod error;
pub mod external;
pub mod harness;
pub mod rng;
mod search;
pub mod skip_list;
pub mod treap;
pub mod workload;

pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use rng::RandomSource;
pub use search::{SearchEngine, SearchResult};
pub use skip_list::{SkipList, SkipListConfig};
pub use treap::Treap;
