//! Temp-file writer with atomic finalize.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::temp_path;

/// Writer for one asset's `.part` file. Call `finalize` to move it into place
/// or `discard` to remove it.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
}

impl StorageWriter {
    /// Create the temp file for `final_path` (`final_path` + `.part`).
    /// Overwrites a stale temp file if one exists.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(Self { file, temp_path })
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .with_context(|| format!("write failed: {}", self.temp_path.display()))
    }

    /// Sync file data to disk.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all().context("storage sync failed")
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path;
        drop(self.file);

        if let Err(e) = std::fs::rename(&temp_path, final_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    final_path.display()
                )
            });
        }
        Ok(())
    }

    /// Close and delete the temp file.
    pub fn discard(self) {
        let temp_path = self.temp_path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::warn!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_moves_temp_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("a.png");
        let mut w = StorageWriter::create(&final_path).unwrap();
        assert!(w.temp_path().ends_with("a.png.part"));
        w.write_all(b"hello").unwrap();
        w.sync().unwrap();
        w.finalize(&final_path).unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello");
        assert!(!dir.path().join("a.png.part").exists());
    }

    #[test]
    fn discard_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("b.gif");
        let mut w = StorageWriter::create(&final_path).unwrap();
        w.write_all(b"partial").unwrap();
        w.discard();
        assert!(!final_path.exists());
        assert!(!dir.path().join("b.gif.part").exists());
    }
}
