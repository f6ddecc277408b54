//! Dataset files: `n` random `u32` words in native byte order, one file per
//! size, reused across runs.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use rand_core::RngCore;

use crate::error::{Error, Result};

/// `dir/data_{n}.bin`.
pub fn path_for(dir: &Path, n: usize) -> PathBuf {
    return dir.join(format!("data_{}.bin", n));
}

/// Return the dataset for `n`, generating it only if it is missing or has
/// the wrong length.
pub fn ensure<R: RngCore>(dir: &Path, n: usize, rng: &mut R) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = path_for(dir, n);
    let expected = (n as u64) * 4;

    match std::fs::metadata(&path) {
        Ok(meta) if meta.len() == expected => {
            tracing::debug!(path = %path.display(), n, "reusing dataset");
            return Ok(path);
        }
        Ok(meta) => {
            tracing::warn!(path = %path.display(), len = meta.len(), expected, "dataset has wrong length, regenerating");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(&path, e)),
    }

    tracing::info!(path = %path.display(), n, "generating dataset");
    write(&path, (0..n).map(|_| rng.next_u32()))?;
    return Ok(path);
}

/// Write words to `path`, replacing any existing file.
pub fn write(path: &Path, words: impl IntoIterator<Item = u32>) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    for word in words {
        out.write_all(&word.to_ne_bytes()).map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn name_embeds_size() {
        assert_eq!(path_for(Path::new("d"), 42), PathBuf::from("d/data_42.bin"));
    }

    #[test]
    fn generates_once_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let path = ensure(dir.path(), 100, &mut rng).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 400);

        let before = std::fs::read(&path).unwrap();
        let mut other = StdRng::seed_from_u64(2);
        ensure(dir.path(), 100, &mut other).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn regenerates_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_for(dir.path(), 10);
        std::fs::write(&path, [0u8; 7]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        ensure(dir.path(), 10, &mut rng).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 40);
    }

    #[test]
    fn write_is_native_endian() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.bin");
        write(&path, [1u32, 0x0102_0304]).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &1u32.to_ne_bytes());
        assert_eq!(&bytes[4..], &0x0102_0304u32.to_ne_bytes());
    }
}
