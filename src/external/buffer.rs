//! A file of native-endian `u32` words, mapped read/write.
//!
//! The map is held for as long as the `MappedBuffer` lives and released when
//! it drops, on every exit path. Writes through the view land in the file.

use std::fs::File;
use std::fs::OpenOptions;
use std::ops::Deref;
use std::ops::DerefMut;
use std::path::Path;
use std::path::PathBuf;

use memmap2::MmapMut;

use crate::error::{Error, Result};

const WORD: u64 = std::mem::size_of::<u32>() as u64;

pub struct MappedBuffer {
    path: PathBuf,
    /// `None` for an empty file, which cannot be mapped.
    map: Option<MmapMut>,
    len: usize,
    // Dropped after `map`, so the map never outlives its file.
    _file: File,
}

impl MappedBuffer {
    /// Map an existing dataset file.
    ///
    /// The file must be a whole number of words long.
    pub fn open(path: impl AsRef<Path>) -> Result<MappedBuffer> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;
        let bytes = file.metadata().map_err(|e| Error::io(path, e))?.len();
        if bytes % WORD != 0 {
            return Err(Error::Misaligned { path: path.to_path_buf(), len: bytes });
        }

        let map = if bytes == 0 {
            None
        } else {
            // SAFETY: the harness owns the dataset file for the duration of
            // the run; nothing else truncates or remaps it while mapped.
            let map = unsafe { MmapMut::map_mut(&file) }.map_err(|e| Error::io(path, e))?;
            Some(map)
        };

        let len = (bytes / WORD) as usize;
        tracing::debug!(path = %path.display(), len, "mapped dataset");
        return Ok(MappedBuffer { path: path.to_path_buf(), map, len, _file: file });
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    pub fn as_slice(&self) -> &[u32] {
        let Some(map) = &self.map else {
            return &[];
        };
        // SAFETY: mappings are page aligned, so the prefix is empty, and the
        // length is a multiple of 4, so the suffix is empty too.
        let (prefix, words, suffix) = unsafe { map.align_to::<u32>() };
        debug_assert!(prefix.is_empty() && suffix.is_empty());
        return words;
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        let Some(map) = &mut self.map else {
            return &mut [];
        };
        // SAFETY: see `as_slice`.
        let (prefix, words, suffix) = unsafe { map.align_to_mut::<u32>() };
        debug_assert!(prefix.is_empty() && suffix.is_empty());
        return words;
    }

    /// Write dirty pages back to the file.
    pub fn flush(&self) -> Result<()> {
        if let Some(map) = &self.map {
            map.flush().map_err(|e| Error::io(&self.path, e))?;
        }
        return Ok(());
    }
}

impl Deref for MappedBuffer {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        return self.as_slice();
    }
}

impl DerefMut for MappedBuffer {
    fn deref_mut(&mut self) -> &mut [u32] {
        return self.as_mut_slice();
    }
}

impl Drop for MappedBuffer {
    fn drop(&mut self) {
        tracing::trace!(path = %self.path.display(), "unmapping dataset");
    }
}

/// Map `path`, run `f` on the view, flush, and release the mapping.
///
/// The mapping is released whether `f` succeeds or fails.
pub fn with_mapped<T>(
    path: impl AsRef<Path>,
    f: impl FnOnce(&mut MappedBuffer) -> Result<T>,
) -> Result<T> {
    let mut buffer = MappedBuffer::open(path)?;
    let out = f(&mut buffer)?;
    buffer.flush()?;
    return Ok(out);
}
