//! Record files.
//!
//! A record file holds exactly one encoded record and nothing else: no
//! header, no length prefix. Writing stores the bytes unaltered through a
//! temporary file in the same directory, so a failed write never leaves a
//! truncated record behind; reading
//! takes exactly the layout width and rejects short files and trailing
//! bytes alike.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use fixrec_core::{RecordCodec, RecordValues};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Write `record` to `path`, replacing any existing file.
///
/// The bytes land in a temporary sibling first and are renamed over `path`
/// only once fully written. On error `path` is left as it was.
///
/// # Returns
/// Number of bytes written.
pub fn write_record(path: &Path, record: &[u8]) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create a temporary file in {}", dir.display()))?;
    file.write_all(record)
        .with_context(|| format!("cannot write {}", path.display()))?;
    file.flush()?;
    file.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("cannot replace {}", path.display()))?;

    info!(path = %path.display(), bytes = record.len(), "wrote record");
    Ok(record.len())
}

/// Read exactly `width` bytes from `path`.
///
/// # Errors
/// Fails if the file cannot be opened, holds fewer than `width` bytes, or
/// holds more.
pub fn read_record(path: &Path, width: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;

    let mut bytes = vec![0u8; width];
    if let Err(err) = file.read_exact(&mut bytes) {
        if err.kind() == ErrorKind::UnexpectedEof {
            bail!("{} is shorter than the {width}-byte record", path.display());
        }
        return Err(err).with_context(|| format!("cannot read {}", path.display()));
    }

    let mut probe = [0u8; 1];
    if file.read(&mut probe)? != 0 {
        bail!("{} has bytes after the {width}-byte record", path.display());
    }

    debug!(path = %path.display(), bytes = width, "read record");
    Ok(bytes)
}

/// Read a record file and decode it.
pub fn load_record(path: &Path, codec: &RecordCodec) -> Result<RecordValues> {
    let bytes = read_record(path, codec.width())?;
    let values = codec
        .decode(&bytes)
        .with_context(|| format!("cannot decode {}", path.display()))?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixrec_core::Value;

    fn codec() -> RecordCodec {
        RecordCodec::new(">i4sh".parse().unwrap())
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bin");

        let values = vec![Value::from(7), Value::from(b"spam"), Value::from(8)];
        let record = codec().encode(&values).unwrap();

        assert_eq!(write_record(&path, &record).unwrap(), 10);
        assert_eq!(std::fs::read(&path).unwrap(), b"\x00\x00\x00\x07spam\x00\x08");
        assert_eq!(load_record(&path, &codec()).unwrap(), values);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"an older and longer record").unwrap();

        write_record(&path, b"spam").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"spam");

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file left behind");
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("test.bin");

        assert!(write_record(&path, b"spam").is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_replace_keeps_old_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::create_dir(&path).unwrap();

        assert!(write_record(&path, b"spam").is_err());
        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 6]).unwrap();

        let err = read_record(&path, 10).unwrap_err();
        assert!(err.to_string().contains("shorter"));
    }

    #[test]
    fn test_trailing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.bin");
        std::fs::write(&path, [0u8; 11]).unwrap();

        let err = read_record(&path, 10).unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_record(&dir.path().join("absent.bin"), 10);
        assert!(result.is_err());
    }
}
