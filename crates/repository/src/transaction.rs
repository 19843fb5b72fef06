//! The writable Transaction (`spec.md` §4.4): a Commit view with mutation
//! enabled, always rooted at the repository head at construction time.

use crate::backend::{Backend, TransactionIo};
use crate::config::Signature;
use crate::error::{CatalogError, Error, Result, UncatalogError};
use crate::tree::{self, NodeId, Tree};
use stac::Value;
use stac_io::{FilesystemIo, Permission, Readable, Scope};
use std::cell::{Cell, RefCell};
use tracing::{info, warn};

/// The optional, caller-controlled scope widenings accepted by
/// [`Transaction::catalog`] (`spec.md` §4.4).
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// The existing object to graft the product under; `None` means the root catalog.
    pub parent_id: Option<String>,

    /// Allow reading asset bytes (and nested STAC descendants) from the product's own directory.
    pub catalog_assets: bool,

    /// Allow reading arbitrary STAC descendants from anywhere.
    pub catalog_out_of_scope: bool,

    /// Allow reading arbitrary asset bytes from anywhere.
    pub catalog_assets_out_of_scope: bool,
}

impl CatalogOptions {
    /// The default options: graft under the root catalog, no out-of-scope reads.
    pub fn new() -> CatalogOptions {
        CatalogOptions::default()
    }

    /// Sets the parent to graft the product under.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> CatalogOptions {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Allows reading assets (and nested STAC descendants) from the product's own directory.
    pub fn with_catalog_assets(mut self, value: bool) -> CatalogOptions {
        self.catalog_assets = value;
        self
    }

    /// Allows reading arbitrary STAC descendants from anywhere.
    pub fn with_catalog_out_of_scope(mut self, value: bool) -> CatalogOptions {
        self.catalog_out_of_scope = value;
        self
    }

    /// Allows reading arbitrary asset bytes from anywhere.
    pub fn with_catalog_assets_out_of_scope(mut self, value: bool) -> CatalogOptions {
        self.catalog_assets_out_of_scope = value;
        self
    }
}

fn dirname(href: &str) -> String {
    href.rsplit_once('/').map(|(dir, _)| dir.to_string()).unwrap_or_default()
}

/// Builds the reader scope for a product being cataloged (`spec.md` §4.4):
/// the product document itself is always readable; the three booleans
/// progressively widen that to its own directory, then to the whole
/// address space, for STAC descendants and asset bytes respectively.
fn product_scope(product_file: &str, options: &CatalogOptions) -> Scope {
    let mut scope = Scope::new(product_file).allow(product_file, [Permission::ReadStac]);
    if options.catalog_assets {
        scope = scope.allow(dirname(product_file), [Permission::ReadStac, Permission::ReadAsset]);
    }
    if options.catalog_out_of_scope {
        scope = scope.allow("", [Permission::ReadStac]);
    }
    if options.catalog_assets_out_of_scope {
        scope = scope.allow("", [Permission::ReadAsset]);
    }
    scope
}

/// A writable snapshot of the repository, rooted at the head commit at the
/// time it was created.
#[derive(Debug)]
pub struct Transaction {
    backend: Backend,
    io: TransactionIo,
    tree: RefCell<Tree>,
    root: NodeId,
    finished: Cell<bool>,
}

impl Transaction {
    /// Acquires the single-writer lock and opens a Transaction over
    /// `backend`'s current head. Fails `transaction-lock-held` if another
    /// Transaction is already live.
    pub(crate) fn new(backend: Backend) -> Result<Transaction> {
        backend.write_lock()?;
        let io = backend.transaction_io();
        let catalog_href = backend.catalog_href();
        let mut tree = Tree::new();
        let root = match tree::load(&mut tree, &catalog_href, &io, false, false) {
            Ok(root) => root,
            Err(error) => {
                let _ = backend.discard();
                return Err(error);
            }
        };
        Ok(Transaction {
            backend,
            io,
            tree: RefCell::new(tree),
            root,
            finished: Cell::new(false),
        })
    }

    /// Inserts or replaces `product_file` under the tree, per `spec.md`
    /// §4.4's seven-step algorithm.
    pub fn catalog(&self, product_file: &str, options: &CatalogOptions) -> Result<()> {
        let scope = product_scope(product_file, options);
        let reader = FilesystemIo::with_scope(scope);

        // 1. Load the product eagerly and strictly: it must come in whole.
        let mut product_tree = Tree::new();
        let product_root = tree::load(&mut product_tree, product_file, &reader, true, true)?;

        if self.backend.repository_config().validate {
            validate_blocking(&product_tree.get(product_root).value)?;
        }

        // 2. Detach it from its origin tree.
        tree::unset_parent(&mut product_tree, product_root);
        let product_id = product_tree.get(product_root).value.id().to_string();

        // 3. Replace any existing object with the same id.
        let collision = {
            let mut tree = self.tree.borrow_mut();
            tree::search(&mut tree, self.root, &product_id, &self.io)?.is_some()
        };
        if collision {
            self.uncatalog(&product_id)?;
        }

        let mut tree = self.tree.borrow_mut();

        // 4. Resolve and validate the parent.
        let parent = match &options.parent_id {
            None => self.root,
            Some(parent_id) => tree::search(&mut tree, self.root, parent_id, &self.io)?
                .ok_or_else(|| Error::parent_not_found(parent_id.clone()))?,
        };
        if matches!(tree.get(parent).value, Value::Item(_)) {
            let id = tree.get(parent).value.id().to_string();
            return Err(Error::parent_is_item(id));
        }

        // 5. Graft the product in and re-link.
        let grafted = tree::graft(&mut tree, &product_tree, product_root);
        tree::set_parent(&mut tree, grafted, parent);

        // Relocate to the best-practices layout under the parent's directory.
        let parent_dir = dirname(tree.get(parent).value.self_href().unwrap_or_default());
        let root_href = tree.get(self.root).value.self_href().unwrap_or_default().to_string();
        tree::relocate(&mut tree, grafted, &parent_dir, &root_href)?;

        // 6/7. Recompute ancestor extents and save the highest that still validates.
        let highest = self.recompute_ancestors(&mut tree, parent)?;
        tree::save(&tree, highest, &self.io, Some(&self.backend)).map_err(|error| CatalogError::SaveFailed(Box::new(error)))?;
        info!(product = %product_id, parent = %tree.get(parent).value.id(), "cataloged product");
        Ok(())
    }

    /// Removes `product_id` and its descendants, per `spec.md` §4.4's
    /// six-step algorithm.
    pub fn uncatalog(&self, product_id: &str) -> Result<()> {
        let mut tree = self.tree.borrow_mut();

        // 1. Locate the product against the current head-plus-pending state.
        let node = tree::search(&mut tree, self.root, product_id, &self.io)?
            .ok_or_else(|| stac_io::Error::NotFound(product_id.to_string()))?;

        // 2. It must have a parent; the root catalog cannot be uncataloged.
        let parent = tree::load_parent(&mut tree, node, &self.io)?.ok_or(UncatalogError::Root)?;

        // 3/4. Detach it from the parent and delete its subtree.
        tree::unset_parent(&mut tree, node);
        tree::delete(&tree, node, &self.io)?;

        // 5/6. Recompute ancestor extents and save the highest that still validates.
        let highest = self.recompute_ancestors(&mut tree, parent)?;
        tree::save(&tree, highest, &self.io, Some(&self.backend)).map_err(|error| UncatalogError::SaveFailed(Box::new(error)))?;
        info!(product = product_id, "uncataloged product");
        Ok(())
    }

    /// Walks up from `parent`, recomputing every Collection ancestor's
    /// extent, stopping (and logging) at the first one whose
    /// recomputation fails, or at the root. Returns the highest ancestor
    /// reached, which is always at least `parent` itself (its content
    /// changed regardless of kind, since its child link set changed).
    fn recompute_ancestors(&self, tree: &mut Tree, parent: NodeId) -> Result<NodeId> {
        let mut highest = parent;
        let mut current = Some(parent);
        while let Some(node) = current {
            if matches!(tree.get(node).value, Value::Collection(_)) {
                match tree::compute_extent(tree, node, &self.io) {
                    Ok(entries) => tree::apply_extent(tree, node, &entries),
                    Err(error) => {
                        warn!(ancestor = %tree.get(node).value.id(), %error, "stopping ancestor extent recomputation");
                        break;
                    }
                }
            }
            highest = node;
            current = tree::load_parent(tree, node, &self.io)?;
        }
        Ok(highest)
    }

    /// Depth-first search for the object with the given `id`, against this
    /// transaction's current head-plus-pending state.
    pub fn search(&self, id: &str) -> Result<Option<Value>> {
        let mut tree = self.tree.borrow_mut();
        match tree::search(&mut tree, self.root, id, &self.io)? {
            Some(node) => Ok(Some(tree.get(node).value.clone())),
            None => Ok(None),
        }
    }

    /// Finalises all pending writes as a new commit, releasing the lock.
    pub fn commit(&self, message: &str) -> Result<String> {
        self.commit_as(message, None)
    }

    /// Finalises all pending writes as a new commit authored by
    /// `signature`, releasing the lock.
    pub fn commit_as(&self, message: &str, signature: Option<&Signature>) -> Result<String> {
        let id = self.backend.finalize(message, signature)?;
        self.finished.set(true);
        Ok(id)
    }

    /// Discards all pending writes, restoring the pre-transaction state,
    /// and releases the lock.
    pub fn abort(&self) -> Result<()> {
        self.backend.discard()?;
        self.finished.set(true);
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished.get() {
            if let Err(error) = self.backend.discard() {
                warn!(%error, "abort-on-drop failed for an unfinished transaction");
            }
        }
    }
}

fn validate_blocking(value: &Value) -> Result<()> {
    use stac_validate::Validate;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(value.validate())?;
    Ok(())
}
