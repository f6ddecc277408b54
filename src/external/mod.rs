//! External selection and sort over memory-mapped dataset files.
//!
//! `MappedBuffer` owns the mapping; `select` and `sort` operate on the
//! `&mut [u32]` it derefs to. Datasets far larger than a comfortable heap
//! allocation are processed without loading them first: the page cache does
//! the paging.
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use searchbench::external::{select, with_mapped};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let median = with_mapped("data_1000.bin", |view| {
//!     let high = view.len() - 1;
//!     return select(view, 0, high, high / 2, &mut rng);
//! })?;
//! # Ok::<(), searchbench::Error>(())
//! ```

mod buffer;
mod select;

pub use buffer::MappedBuffer;
pub use buffer::with_mapped;
pub use select::partition;
pub use select::select;
pub use select::sort;
