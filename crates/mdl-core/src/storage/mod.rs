//! Filesystem sink: category directories, collision-free names, atomic writes.
//!
//! Each asset lands in `<root>/<category dir>/<name>`. Category directories are
//! created on first write. When `<name>` is taken, `name_1.ext`, `name_2.ext`,
//! ... are tried in order. Bytes go to `<final>.part` and are renamed into
//! place, so a successful store never leaves a partial file behind.

mod writer;

pub use writer::StorageWriter;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

use crate::category::Category;
use crate::url_model::derive_filename;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// `name.ext` with disambiguator `n` → `name_n.ext`; `n == 0` is the name itself.
pub fn disambiguated_name(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{n}.{ext}"),
        _ => format!("{filename}_{n}"),
    }
}

fn is_taken(path: &Path) -> bool {
    path.exists() || temp_path(path).exists()
}

/// First free name for `filename` in `dir`. Caller must hold the directory lock.
fn claim_free_path(dir: &Path, filename: &str) -> PathBuf {
    let mut n = 0u32;
    loop {
        let candidate = dir.join(disambiguated_name(filename, n));
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// A successfully stored asset.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Path relative to the output root, `/`-separated (e.g. `images/a_1.png`).
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub bytes: u64,
}

/// Writes downloaded assets under an output root. Safe to share between workers.
#[derive(Debug)]
pub struct FilesystemSink {
    root: PathBuf,
    dir_locks: Mutex<HashMap<Category, Arc<Mutex<()>>>>,
}

impl FilesystemSink {
    /// Creates the output root (and parents). Category directories are not created yet.
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create output directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            dir_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_lock(&self, category: Category) -> Arc<Mutex<()>> {
        let mut locks = self.dir_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(category).or_default())
    }

    /// Stores `data` for an asset of `category` fetched from `url`.
    ///
    /// Name selection and the write happen under the category directory's lock,
    /// so concurrent workers never claim the same name.
    pub fn store(&self, category: Category, url: &Url, data: &[u8]) -> Result<StoredFile> {
        let Some(dir_name) = category.dir_name() else {
            anyhow::bail!("refusing to store rejected asset {url}");
        };
        let filename = derive_filename(url);
        let dir = self.root.join(dir_name);

        let lock = self.dir_lock(category);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let final_path = claim_free_path(&dir, &filename);

        let mut writer = StorageWriter::create(&final_path)?;
        if let Err(e) = writer.write_all(data).and_then(|()| writer.sync()) {
            writer.discard();
            return Err(e);
        }
        writer.finalize(&final_path)?;

        let stored_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(filename);
        tracing::debug!(path = %final_path.display(), bytes = data.len(), "stored {}", url);

        Ok(StoredFile {
            relative_path: format!("{dir_name}/{stored_name}"),
            absolute_path: final_path,
            bytes: data.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests;
