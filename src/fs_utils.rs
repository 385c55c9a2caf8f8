//! Local filesystem utilities
//!
//! Moves that survive crossing filesystems, and whole-file replacement that
//! never leaves a half-written file behind.

use std::io::Write;
use std::path::Path;

/// Rename `source` to `target`, falling back to copy-then-delete when the
/// two paths live on different filesystems.
///
/// Returns the number of bytes moved.
pub fn move_file(source: &Path, target: &Path) -> std::io::Result<u64> {
    let size = std::fs::metadata(source)?.len();

    match std::fs::rename(source, target) {
        Ok(()) => Ok(size),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                "{} and {} are on different filesystems, copying",
                source.display(),
                target.display()
            );
            let copied = std::fs::copy(source, target)?;
            std::fs::remove_file(source)?;
            Ok(copied)
        }
        Err(e) => Err(e),
    }
}

/// Replace `path` with `contents` via a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"))?;

    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    let written = std::fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });

    if let Err(e) = written.and_then(|()| std::fs::rename(&tmp_path, path)) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_move_file_same_filesystem() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("expenses.csv");
        let target = dir.path().join("import.csv");
        fs::write(&source, "a,b\n1,2\n").unwrap();

        assert_eq!(move_file(&source, &target).unwrap(), 8);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_move_file_overwrites_target() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("expenses.csv");
        let target = dir.path().join("import.csv");
        fs::write(&source, "new").unwrap();
        fs::write(&target, "old contents").unwrap();

        move_file(&source, &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_move_file_missing_source() {
        let dir = tempdir().unwrap();
        let err = move_file(&dir.path().join("nope"), &dir.path().join("to")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("person.csv");
        fs::write(&path, "before").unwrap();

        write_atomic(&path, b"after").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "after");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("person.csv");

        assert!(write_atomic(&path, b"rows").is_err());
        assert!(!path.exists());
    }
}
