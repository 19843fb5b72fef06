//! The two reference storage backends (`spec.md` §4.5): a plain filesystem
//! tree and a git-versioned working tree. [`Backend`] is the thin enum
//! `Commit`/`Transaction`/`Repository` dispatch on; each variant wraps one
//! of this module's sibling backends and exposes whatever that backend can
//! actually do (history depth 1 vs. unbounded, no `rollback`/`backup` vs.
//! both).

mod fs;
mod git;

pub use fs::{FsBackend, JournaledFsIo};
pub use git::{CommitMeta, GitBackend, GitCommitIo, GitWorkingIo};

use crate::config::{GitBackendConfig, RepositoryConfig};
use crate::error::{Error, Result};
use stac_io::{AssetReader, Readable, Writable};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Which reference backend a [`crate::Repository`] is bound to.
#[derive(Debug, Clone)]
pub enum Backend {
    /// The plain filesystem backend.
    Fs(FsBackend),
    /// The git-versioned backend.
    Git(GitBackend),
}

impl Backend {
    /// The repository's base directory.
    pub fn base_dir(&self) -> &Path {
        match self {
            Backend::Fs(backend) => backend.base_dir(),
            Backend::Git(backend) => backend.base_dir(),
        }
    }

    /// The root catalog's href.
    pub fn catalog_href(&self) -> String {
        match self {
            Backend::Fs(backend) => backend.catalog_href(),
            Backend::Git(backend) => backend.catalog_href(),
        }
    }

    /// The repository-level config shared by both backends.
    pub fn repository_config(&self) -> &RepositoryConfig {
        match self {
            Backend::Fs(backend) => backend.config(),
            Backend::Git(backend) => &backend.config().repository,
        }
    }

    /// `true` if a repository already exists at this backend's base directory.
    pub fn exists(&self) -> bool {
        match self {
            Backend::Fs(backend) => backend.exists(),
            Backend::Git(backend) => backend.exists(),
        }
    }

    /// `true` if this backend's base directory has any entries at all
    /// (used by `init` to refuse to overwrite unrelated content).
    pub fn is_nonempty(&self) -> Result<bool> {
        match self {
            Backend::Fs(backend) => Ok(backend.is_nonempty()?),
            Backend::Git(backend) => {
                let dir = backend.base_dir();
                if !dir.exists() {
                    return Ok(false);
                }
                Ok(std::fs::read_dir(dir)?.next().is_some())
            }
        }
    }

    /// Runs this backend's `open`-time crash recovery.
    pub fn recover(&self) -> Result<()> {
        match self {
            Backend::Fs(backend) => Ok(backend.discard_pending()?),
            Backend::Git(backend) => Ok(backend.recover()?),
        }
    }

    /// Acquires the single-writer lock for a new [`crate::Transaction`].
    pub fn write_lock(&self) -> Result<()> {
        match self {
            Backend::Fs(backend) => Ok(backend.write_lock()?),
            Backend::Git(backend) => Ok(backend.write_lock()?),
        }
    }

    /// Returns a [`Writable`] IO over this backend's pending transaction state.
    pub fn transaction_io(&self) -> TransactionIo {
        match self {
            Backend::Fs(backend) => TransactionIo::Fs(JournaledFsIo::new(backend.base_dir())),
            Backend::Git(backend) => TransactionIo::Git(GitWorkingIo::new(backend.base_dir())),
        }
    }

    /// Finalises a transaction, producing the id of the new commit.
    pub fn finalize(&self, message: &str, signature: Option<&crate::config::Signature>) -> Result<String> {
        match self {
            Backend::Fs(backend) => {
                backend.finalize_pending()?;
                Ok(backend.catalog_href())
            }
            Backend::Git(backend) => Ok(backend.commit(message, signature)?),
        }
    }

    /// Discards a transaction's pending writes.
    pub fn discard(&self) -> Result<()> {
        match self {
            Backend::Fs(backend) => Ok(backend.discard_pending()?),
            Backend::Git(backend) => Ok(backend.abort()?),
        }
    }

    /// The full commit history, most recent first. For the filesystem
    /// backend this is always a single synthetic entry, since only one
    /// commit exists at a time (`spec.md` §4.5).
    pub fn history(&self) -> Result<Vec<CommitMeta>> {
        match self {
            Backend::Fs(backend) => Ok(vec![fs_head_commit(backend)?]),
            Backend::Git(backend) => Ok(backend.history()?),
        }
    }

    /// Looks up a commit's full metadata by id (used by [`crate::Commit::parent`]).
    pub fn commit_meta(&self, id: &str) -> Result<CommitMeta> {
        match self {
            Backend::Fs(backend) => {
                if id == backend.catalog_href() {
                    fs_head_commit(backend)
                } else {
                    Err(Error::CommitNotFound(id.to_string()))
                }
            }
            Backend::Git(backend) => Ok(backend.commit_meta(id)?),
        }
    }

    /// Resolves a commit reference (`spec.md` §4.5/§6).
    pub fn resolve_ref(&self, r#ref: &str) -> Result<CommitMeta> {
        match self {
            Backend::Fs(backend) => {
                if matches!(r#ref, "0") {
                    fs_head_commit(backend)
                } else {
                    Err(Error::RefTypeError(r#ref.to_string()))
                }
            }
            Backend::Git(backend) => Ok(backend.resolve_ref(r#ref)?),
        }
    }

    /// Returns a [`Readable`] IO fixed to the commit with the given id.
    pub fn commit_io(&self, id: &str) -> Result<CommitIo> {
        match self {
            Backend::Fs(_) => Ok(CommitIo::Fs(stac_io::FilesystemIo::new(
                self.base_dir().to_string_lossy().into_owned(),
            ))),
            Backend::Git(backend) => {
                let oid = git2::Oid::from_str(id)?;
                Ok(CommitIo::Git(GitCommitIo::new(backend.base_dir(), backend.base_dir(), oid)))
            }
        }
    }

    /// Notifies the backend that an asset of `size` bytes was just written
    /// at `href` (an absolute path under this backend's working tree), so
    /// size-based policies (Git LFS) can act on it. A no-op on the
    /// filesystem backend, which has none.
    pub fn record_asset_write(&self, href: &str, size: u64) -> Result<()> {
        match self {
            Backend::Fs(_) => Ok(()),
            Backend::Git(backend) => {
                let relative = backend.relative_path(href);
                Ok(backend.maybe_mark_for_lfs(&relative, size)?)
            }
        }
    }

    /// `rollback`: optional; only the git backend supports it.
    pub fn rollback(&self, id: &str) -> Result<()> {
        match self {
            Backend::Fs(_) => Err(Error::NotSupported("rollback")),
            Backend::Git(backend) => Ok(backend.rollback(id)?),
        }
    }

    /// `backup`: optional; only the git backend supports it.
    pub fn backup(&self, destination: &Path) -> Result<()> {
        match self {
            Backend::Fs(_) => Err(Error::NotSupported("backup")),
            Backend::Git(backend) => Ok(backend.backup(destination)?),
        }
    }
}

fn fs_head_commit(backend: &FsBackend) -> Result<CommitMeta> {
    let metadata = std::fs::metadata(PathBuf::from(backend.catalog_href()))?;
    let modified = metadata.modified()?;
    Ok(CommitMeta {
        id: backend.catalog_href(),
        datetime: modified.into(),
        message: None,
        parent: None,
        author: None,
        committer: None,
    })
}

/// Constructs a backend and its config object together, mapping the two
/// reference forms onto one enum (used by [`crate::Repository::init`]/[`crate::Repository::open`]).
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// The filesystem backend's configuration.
    Fs(RepositoryConfig),
    /// The git backend's configuration.
    Git(GitBackendConfig),
}

impl BackendConfig {
    pub(crate) fn into_backend(self, base_dir: impl Into<PathBuf>) -> Backend {
        match self {
            BackendConfig::Fs(config) => Backend::Fs(FsBackend::new(base_dir, config)),
            BackendConfig::Git(config) => Backend::Git(GitBackend::new(base_dir, config)),
        }
    }
}

/// A [`Writable`] IO over whichever backend a [`crate::Transaction`] is
/// driving.
#[derive(Debug, Clone)]
pub enum TransactionIo {
    /// The journaled filesystem IO.
    Fs(JournaledFsIo),
    /// The git working-tree IO.
    Git(GitWorkingIo),
}

impl Readable for TransactionIo {
    fn get(&self, href: &str) -> stac_io::Result<serde_json::Value> {
        match self {
            TransactionIo::Fs(io) => io.get(href),
            TransactionIo::Git(io) => io.get(href),
        }
    }

    fn get_asset(&self, href: &str) -> stac_io::Result<AssetReader> {
        match self {
            TransactionIo::Fs(io) => io.get_asset(href),
            TransactionIo::Git(io) => io.get_asset(href),
        }
    }
}

impl Writable for TransactionIo {
    fn put(&self, href: &str, value: &serde_json::Value) -> stac_io::Result<()> {
        match self {
            TransactionIo::Fs(io) => io.put(href, value),
            TransactionIo::Git(io) => io.put(href, value),
        }
    }

    fn put_asset(&self, href: &str, reader: &mut dyn Read) -> stac_io::Result<()> {
        match self {
            TransactionIo::Fs(io) => io.put_asset(href, reader),
            TransactionIo::Git(io) => io.put_asset(href, reader),
        }
    }

    fn delete(&self, href: &str) -> stac_io::Result<()> {
        match self {
            TransactionIo::Fs(io) => io.delete(href),
            TransactionIo::Git(io) => io.delete(href),
        }
    }
}

/// A [`Readable`]-only IO fixed to one historical commit.
#[derive(Debug, Clone)]
pub enum CommitIo {
    /// Reads the filesystem backend's (only ever current) committed state.
    Fs(stac_io::FilesystemIo),
    /// Reads a historical git commit's blobs.
    Git(GitCommitIo),
}

impl Readable for CommitIo {
    fn get(&self, href: &str) -> stac_io::Result<serde_json::Value> {
        match self {
            CommitIo::Fs(io) => io.get(href),
            CommitIo::Git(io) => io.get(href),
        }
    }

    fn get_asset(&self, href: &str) -> stac_io::Result<AssetReader> {
        match self {
            CommitIo::Fs(io) => io.get_asset(href),
            CommitIo::Git(io) => io.get_asset(href),
        }
    }
}
