//! Error type shared by every engine and the harness.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building structures, mapping dataset
/// files or driving a benchmark.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a whole number of `u32` words.
    #[error("{} is {len} bytes, not a multiple of 4", .path.display())]
    Misaligned { path: PathBuf, len: u64 },

    #[error("index {index} outside [{low}, {high}]")]
    IndexOutOfRange { index: usize, low: usize, high: usize },

    #[error("empty range")]
    EmptyRange,

    #[error("out of memory while growing structure")]
    OutOfMemory,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach a path to an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        return Error::Io { path: path.into(), source };
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        return Error::OutOfMemory;
    }
}

pub type Result<T> = std::result::Result<T, Error>;
