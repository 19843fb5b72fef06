//! The filesystem backend: a plain directory tree, per-file `.tmp`/`.bck`
//! journaling, and a `.lock` file for single-writer exclusion.
//!
//! Grounded in `stac-io`'s [`FilesystemIo`](stac_io::FilesystemIo), which
//! already does atomic single-file writes (write to `.tmp`, fsync, rename).
//! That's sufficient for a single `put`, but a whole [`crate::Transaction`]
//! needs its writes to stay invisible to outside readers until `commit`, and
//! fully reversible on `abort` — so this module journals at the
//! transaction's granularity instead, on top of plain [std::fs] calls.

use crate::config::RepositoryConfig;
use crate::error::{Error, Result};
use stac_io::{AssetReader, Readable, Writable};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".lock";
const TMP_SUFFIX: &str = ".tmp";
const BCK_SUFFIX: &str = ".bck";

/// The filesystem backend's repository-level state: where it lives and its
/// root-catalog configuration.
#[derive(Debug, Clone)]
pub struct FsBackend {
    base_dir: PathBuf,
    config: RepositoryConfig,
}

impl FsBackend {
    /// Opens a handle onto `base_dir`; does not touch disk.
    pub fn new(base_dir: impl Into<PathBuf>, config: RepositoryConfig) -> FsBackend {
        FsBackend {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// The repository's base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The repository's configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The root catalog's href.
    pub fn catalog_href(&self) -> String {
        self.base_dir.join("catalog.json").to_string_lossy().into_owned()
    }

    fn lock_path(&self) -> PathBuf {
        self.base_dir.join(LOCK_FILE)
    }

    /// `true` if `base_dir` holds a repository already (a `catalog.json` exists).
    pub fn exists(&self) -> bool {
        self.base_dir.join("catalog.json").is_file()
    }

    /// `true` if `base_dir` has any entries at all.
    pub fn is_nonempty(&self) -> Result<bool> {
        if !self.base_dir.exists() {
            return Ok(false);
        }
        Ok(fs::read_dir(&self.base_dir)?.next().is_some())
    }

    /// Writes the repository root marker (`base_dir` must already exist).
    pub fn write_lock(&self) -> Result<()> {
        let path = self.lock_path();
        if path.exists() {
            return Err(Error::TransactionLockHeld);
        }
        File::create(path)?;
        Ok(())
    }

    /// Removes the `.lock` file.
    pub fn remove_lock(&self) -> Result<()> {
        let path = self.lock_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Runs crash recovery / `abort` cleanup: deletes every stray `.tmp`,
    /// restores every `.bck` to its original name, and removes the lock.
    ///
    /// This single routine covers both crash-recovery states described in
    /// `spec.md` §5 ("mid-write" and "mid-commit"), since restoring `.bck`
    /// files is a no-op when none exist.
    pub fn discard_pending(&self) -> Result<()> {
        walk(&self.base_dir, &mut |path| {
            if has_suffix(path, TMP_SUFFIX) {
                fs::remove_file(path)?;
            } else if has_suffix(path, BCK_SUFFIX) {
                fs::rename(path, strip_suffix(path, BCK_SUFFIX))?;
            }
            Ok(())
        })?;
        self.remove_lock()
    }

    /// Finalises a transaction: renames every `.tmp` to its final name,
    /// removes every `.bck`, prunes directories left empty, and releases
    /// the lock.
    pub fn finalize_pending(&self) -> Result<()> {
        walk(&self.base_dir, &mut |path| {
            if has_suffix(path, TMP_SUFFIX) {
                fs::rename(path, strip_suffix(path, TMP_SUFFIX))?;
            } else if has_suffix(path, BCK_SUFFIX) {
                fs::remove_file(path)?;
            }
            Ok(())
        })?;
        self.prune_empty_dirs(&self.base_dir)?;
        self.remove_lock()
    }

    fn prune_empty_dirs(&self, dir: &Path) -> Result<bool> {
        if dir == self.lock_path() {
            return Ok(false);
        }
        let mut all_children_prunable = true;
        let mut has_entries = false;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            has_entries = true;
            if self.is_ignored(&path) {
                // Left on disk untouched; its presence still makes this
                // directory non-empty, so it can't be removed either.
                all_children_prunable = false;
            } else if path.is_dir() {
                if !self.prune_empty_dirs(&path)? {
                    all_children_prunable = false;
                }
            } else {
                all_children_prunable = false;
            }
        }
        if !has_entries {
            if dir != self.base_dir {
                fs::remove_dir(dir)?;
            }
            return Ok(true);
        }
        if all_children_prunable && dir != self.base_dir {
            fs::remove_dir(dir)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.config.ignore.iter().any(|pattern| pattern == name))
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().ends_with(suffix)
}

fn strip_suffix(path: &Path, suffix: &str) -> PathBuf {
    let s = path.to_string_lossy();
    PathBuf::from(s.strip_suffix(suffix).unwrap_or(&s))
}

fn walk(dir: &Path, visit: &mut impl FnMut(&Path) -> Result<()>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, visit)?;
        } else {
            visit(&path)?;
        }
    }
    Ok(())
}

fn href_to_path(href: &str) -> PathBuf {
    PathBuf::from(href.strip_prefix("file://").unwrap_or(href))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(TMP_SUFFIX);
    PathBuf::from(s)
}

fn bck_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(BCK_SUFFIX);
    PathBuf::from(s)
}

/// A [`Writable`] IO over a filesystem backend that journals every write and
/// delete at the granularity of a single [`crate::Transaction`], rather than
/// committing each call immediately.
///
/// Reads prefer a pending `.tmp` write over the committed file, and treat a
/// pending `.bck` (with no surviving original) as not-found — giving a
/// Transaction's own IO a read-your-writes view of its pending state, per
/// `spec.md` §5.
#[derive(Debug, Clone)]
pub struct JournaledFsIo {
    base_dir: PathBuf,
}

impl JournaledFsIo {
    /// Creates a journaled IO rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> JournaledFsIo {
        JournaledFsIo { base_dir: base_dir.into() }
    }
}

impl Readable for JournaledFsIo {
    fn get(&self, href: &str) -> stac_io::Result<serde_json::Value> {
        let path = href_to_path(href);
        let tmp = tmp_path(&path);
        let bytes = if tmp.is_file() {
            fs::read(&tmp)
        } else if bck_path(&path).is_file() && !path.exists() {
            return Err(stac_io::Error::NotFound(href.to_string()));
        } else {
            fs::read(&path)
        }
        .map_err(|_| stac_io::Error::NotFound(href.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|source| stac_io::Error::MalformedJson {
            href: href.to_string(),
            source,
        })
    }

    fn get_asset(&self, href: &str) -> stac_io::Result<AssetReader> {
        let path = href_to_path(href);
        let tmp = tmp_path(&path);
        let file = if tmp.is_file() {
            File::open(&tmp)
        } else if bck_path(&path).is_file() && !path.exists() {
            return Err(stac_io::Error::NotFound(href.to_string()));
        } else {
            File::open(&path)
        }
        .map_err(|_| stac_io::Error::NotFound(href.to_string()))?;
        Ok(Box::new(file))
    }
}

impl Writable for JournaledFsIo {
    fn put(&self, href: &str, value: &serde_json::Value) -> stac_io::Result<()> {
        let path = href_to_path(href);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = tmp_path(&path);
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    fn put_asset(&self, href: &str, reader: &mut dyn Read) -> stac_io::Result<()> {
        let path = href_to_path(href);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&path);
        let mut file = File::create(&tmp)?;
        std::io::copy(reader, &mut file)?;
        file.sync_all()?;
        Ok(())
    }

    fn delete(&self, href: &str) -> stac_io::Result<()> {
        let path = href_to_path(href);
        let tmp = tmp_path(&path);
        if tmp.is_file() {
            fs::remove_file(&tmp)?;
        }
        if path.is_file() {
            fs::rename(&path, bck_path(&path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use tempfile::tempdir;

    #[test]
    fn journaled_write_is_invisible_until_finalized() {
        let dir = tempdir().unwrap();
        let io = JournaledFsIo::new(dir.path());
        let href = dir.path().join("a.json").to_string_lossy().into_owned();
        io.put(&href, &serde_json::json!({"id": "a"})).unwrap();
        assert!(!Path::new(&href).exists());
        assert!(io.get(&href).is_ok());

        let backend = FsBackend::new(dir.path(), RepositoryConfig::new("root"));
        backend.finalize_pending().unwrap();
        assert!(Path::new(&href).exists());
    }

    #[test]
    fn abort_discards_pending_writes() {
        let dir = tempdir().unwrap();
        let io = JournaledFsIo::new(dir.path());
        let href = dir.path().join("a.json").to_string_lossy().into_owned();
        io.put(&href, &serde_json::json!({"id": "a"})).unwrap();

        let backend = FsBackend::new(dir.path(), RepositoryConfig::new("root"));
        backend.discard_pending().unwrap();
        assert!(!Path::new(&href).exists());
    }

    #[test]
    fn delete_journals_then_restores_on_abort() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), b"{}").unwrap();
        let io = JournaledFsIo::new(dir.path());
        let href = dir.path().join("a.json").to_string_lossy().into_owned();
        io.delete(&href).unwrap();
        assert!(!Path::new(&href).exists());

        let backend = FsBackend::new(dir.path(), RepositoryConfig::new("root"));
        backend.discard_pending().unwrap();
        assert!(Path::new(&href).exists());
    }

    #[test]
    fn prune_empty_dirs_honours_ignore_list() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("child");
        fs::create_dir_all(nested.join(".cache")).unwrap();
        fs::write(nested.join(".cache").join("x"), b"x").unwrap();
        let backend = FsBackend::new(dir.path(), RepositoryConfig::new("root"));
        backend.finalize_pending().unwrap();
        assert!(nested.join(".cache").exists());
    }
}
