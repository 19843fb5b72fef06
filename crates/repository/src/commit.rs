//! The read-only Commit view (`spec.md` §4.3): a point-in-time snapshot of
//! the whole tree, plus metadata and the handful of operations that don't
//! need write access.

use crate::backend::{Backend, CommitIo};
use crate::config::Signature;
use crate::error::Result;
use crate::tree::{self, NodeId, Tree};
use chrono::{DateTime, Utc};
use stac::Value;
use stac_io::FilesystemIo;
use std::cell::RefCell;
use std::path::Path;

/// A point-in-time, read-only view of a repository's tree.
///
/// Lazily resolves more of the tree as `search`/`export` walk it; the
/// arena is cached in a [`RefCell`] since §5 assumes single-threaded,
/// cooperative access on one Commit at a time.
#[derive(Debug)]
pub struct Commit {
    backend: Backend,
    io: CommitIo,
    id: String,
    datetime: DateTime<Utc>,
    message: Option<String>,
    parent_id: Option<String>,
    author: Option<Signature>,
    committer: Option<Signature>,
    tree: RefCell<Tree>,
    root: NodeId,
}

impl Commit {
    /// Builds the Commit view for the backend's current head.
    pub(crate) fn head(backend: Backend) -> Result<Commit> {
        let meta = backend
            .history()?
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::Error::CommitNotFound("HEAD".to_string()))?;
        Commit::from_meta(backend, meta)
    }

    /// Builds the Commit view for a specific, already-resolved commit.
    pub(crate) fn from_meta(backend: Backend, meta: crate::backend::CommitMeta) -> Result<Commit> {
        let io = backend.commit_io(&meta.id)?;
        let mut tree = Tree::new();
        let root = tree::load(&mut tree, &backend.catalog_href(), &io, false, false)?;
        Ok(Commit {
            backend,
            io,
            id: meta.id,
            datetime: meta.datetime,
            message: meta.message,
            parent_id: meta.parent,
            author: meta.author,
            committer: meta.committer,
            tree: RefCell::new(tree),
            root,
        })
    }

    /// This commit's opaque id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When this commit was recorded.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    /// The commit message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The commit's author, if the backend records one.
    pub fn author(&self) -> Option<&Signature> {
        self.author.as_ref()
    }

    /// The commit's committer, if the backend records one.
    pub fn committer(&self) -> Option<&Signature> {
        self.committer.as_ref()
    }

    /// A read-only IO view of this commit's documents and assets.
    pub fn io(&self) -> &CommitIo {
        &self.io
    }

    /// The commit immediately before this one, or `None` at the first commit.
    pub fn parent(&self) -> Result<Option<Commit>> {
        match &self.parent_id {
            None => Ok(None),
            Some(id) => {
                let meta = self.backend.commit_meta(id)?;
                Ok(Some(Commit::from_meta(self.backend.clone(), meta)?))
            }
        }
    }

    /// Depth-first search for the object with the given `id`, starting at
    /// this commit's root catalog.
    pub fn search(&self, id: &str) -> Result<Option<Value>> {
        let mut tree = self.tree.borrow_mut();
        match tree::search(&mut tree, self.root, id, &self.io)? {
            Some(node) => Ok(Some(tree.get(node).value.clone())),
            None => Ok(None),
        }
    }

    /// Materialises this commit's entire tree into `dir` as a
    /// self-contained catalog using the best-practices layout.
    pub fn export(&self, dir: &Path) -> Result<()> {
        let mut tree = Tree::new();
        let root = tree::load(&mut tree, &self.backend.catalog_href(), &self.io, true, false)?;
        let dir_str = dir.to_string_lossy().into_owned();
        tree::export(&mut tree, root, &dir_str)?;
        let io = FilesystemIo::new(dir_str);
        tree::save(&tree, root, &io, None)?;
        Ok(())
    }

    /// Makes this commit the new head; `not-supported` if the backend
    /// cannot represent it (the filesystem backend).
    pub fn rollback(&self) -> Result<()> {
        self.backend.rollback(&self.id)
    }

    /// Copies this commit's full content to `destination`; `not-supported`
    /// if the backend cannot represent it (the filesystem backend).
    pub fn backup(&self, destination: &Path) -> Result<()> {
        self.backend.backup(destination)
    }
}
