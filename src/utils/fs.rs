use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::utils::{CompressorError, CompressorResult};

/// Get file size in bytes, read from disk
pub fn get_file_size(path: impl AsRef<Path>) -> CompressorResult<u64> {
    std::fs::metadata(path.as_ref())
        .map(|m| m.len())
        .map_err(|e| CompressorError::io(format!(
            "Failed to get file size of {}: {}", path.as_ref().display(), e
        )))
}

/// Get file extension as lowercase string
pub fn get_extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// File name for log lines, falling back to the full path.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Returns `path` with `ext` appended unless it already ends with it.
pub fn ensure_extension(path: impl AsRef<Path>, ext: &str) -> PathBuf {
    let path = path.as_ref();
    match get_extension(path) {
        Some(current) if current == ext.to_lowercase() => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }
    }
}

/// Writes `dest` through a temporary sibling file that is renamed into place
/// only after `write` returns `Ok`.
///
/// The temporary file lives in the destination directory so the final rename
/// never crosses filesystems. On any error it is removed and `dest` is left
/// as it was. `on_written` runs after the bytes are flushed, before the rename.
pub fn write_atomically<F, G>(dest: &Path, write: F, on_written: G) -> CompressorResult<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> CompressorResult<()>,
    G: FnOnce(),
{
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let temp = tempfile::Builder::new()
        .prefix(".partial-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|e| CompressorError::io(format!(
            "Cannot create temporary file in {}: {}", dir.display(), e
        )))?;
    debug!("Writing {} via {}", dest.display(), temp.path().display());

    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    on_written();

    // Dropping `temp` on the error path deletes it.
    temp.persist(dest).map_err(|e| CompressorError::io(format!(
        "Cannot move temporary file to {}: {}", dest.display(), e.error
    )))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_extension_appends_when_missing() {
        assert_eq!(ensure_extension("out", "pdf"), PathBuf::from("out.pdf"));
        assert_eq!(ensure_extension("out.PDF", "pdf"), PathBuf::from("out.PDF"));
        assert_eq!(ensure_extension("scan.jpg", "pdf"), PathBuf::from("scan.jpg.pdf"));
    }

    #[test]
    fn atomic_write_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        std::fs::write(&dest, b"old").unwrap();

        let mut flushed = false;
        write_atomically(&dest, |w| Ok(w.write_all(b"new contents")?), || flushed = true).unwrap();

        assert!(flushed);
        assert_eq!(std::fs::read(&dest).unwrap(), b"new contents");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn atomic_write_failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        std::fs::write(&dest, b"old").unwrap();

        let result = write_atomically(
            &dest,
            |w| {
                w.write_all(b"half")?;
                Err(CompressorError::encode("boom"))
            },
            || panic!("must not report a finished write"),
        );

        assert!(result.is_err());
        assert_eq!(std::fs::read(&dest).unwrap(), b"old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn file_size_of_missing_file_is_io_error() {
        let err = get_file_size("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, CompressorError::IO(_)));
    }
}
