use std::fmt;
use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The subcases of a failed [`crate::Transaction::catalog`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogError {
    /// `parent_id` didn't resolve to any object in the tree.
    #[error("parent {0:?} not found")]
    ParentNotFound(String),

    /// `parent_id` resolved to an Item, which cannot have children.
    #[error("parent {0:?} is an item and cannot have children")]
    ParentIsItem(String),

    /// Extent recomputation or IO failed while saving the ancestor chain.
    #[error("saving the ancestor chain failed: {0}")]
    SaveFailed(#[source] Box<Error>),
}

/// The subcases of a failed [`crate::Transaction::uncatalog`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UncatalogError {
    /// The product to remove has no parent, i.e. it is the root catalog.
    #[error("cannot uncatalog the root catalog")]
    Root,

    /// Extent recomputation or IO failed while saving the ancestor chain.
    #[error("saving the ancestor chain failed: {0}")]
    SaveFailed(#[source] Box<Error>),
}

/// One failure collected while driving a batch operation (`ingest`/`prune`).
#[derive(Debug)]
pub struct ErrorGroupEntry {
    /// The source or product id the error is keyed by.
    pub context: String,

    /// The error itself.
    pub error: Error,
}

/// Errors accumulated across a batch operation, keyed by source or product id.
///
/// `Repository::ingest`/`prune` never abort on the first per-product
/// failure (per `spec.md` §7): every product is attempted, and a non-empty
/// group is only surfaced once the driving transaction has exited its
/// scope.
#[derive(Debug, Default)]
pub struct ErrorGroup {
    /// The collected failures, in the order they occurred.
    pub errors: Vec<ErrorGroupEntry>,
}

impl ErrorGroup {
    /// Creates an empty error group.
    pub fn new() -> ErrorGroup {
        ErrorGroup::default()
    }

    /// Records a failure for `context`.
    pub fn push(&mut self, context: impl Into<String>, error: Error) {
        self.errors.push(ErrorGroupEntry {
            context: context.into(),
            error,
        });
    }

    /// Returns `true` if no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `Ok(())` if empty, or `Err(self)` as an [`Error::Group`] otherwise.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Group(self))
        }
    }
}

impl fmt::Display for ErrorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} error(s) during batch operation:", self.errors.len())?;
        for entry in &self.errors {
            writeln!(f, "  {}: {}", entry.context, entry.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorGroup {}

/// Crate-specific error enum.
///
/// Variant names and groupings follow the error kinds enumerated in
/// `spec.md` §7: lifecycle, history navigation, the ingestion driver,
/// document validity, scope/IO, and the `catalog`/`uncatalog` subcases.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `Repository::init` was called against a non-empty base href.
    #[error("repository already initialized at {0:?}")]
    AlreadyInitialized(String),

    /// `Repository::open` found no `catalog.json`, or backend marker, at the base href.
    #[error("no repository found at {0:?}")]
    RepositoryNotFound(String),

    /// [`crate::Repository::get_commit`] found no commit matching the ref.
    #[error("no commit found matching {0:?}")]
    CommitNotFound(String),

    /// [`crate::Repository::get_commit`] found more than one commit id with this prefix.
    #[error("commit reference {0:?} is ambiguous")]
    AmbiguousCommit(String),

    /// The commit reference was not a recognised shape (prefix, head-relative integer, timestamp).
    #[error("unrecognised commit reference: {0:?}")]
    RefTypeError(String),

    /// A `RepositoryConfig`/`GitBackendConfig` value was invalid.
    #[error("invalid repository configuration: {0}")]
    Config(String),

    /// `ingest` was asked for a processor id that isn't registered.
    #[error("no processor registered for id {0:?}")]
    ProcessorNotFound(String),

    /// A processor's `discover`/`id`/`version`/`process` call failed.
    #[error("processing failed: {0}")]
    Processing(String),

    /// A `catalog` call failed; see [`CatalogError`] for the subcase.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An `uncatalog` call failed; see [`UncatalogError`] for the subcase.
    #[error(transparent)]
    Uncatalog(#[from] UncatalogError),

    /// An optional operation (`rollback`, `backup`) isn't implemented by this backend.
    #[error("{0} is not supported by this backend")]
    NotSupported(&'static str),

    /// `backup` was given a url this backend doesn't know how to target.
    #[error("backup destination is invalid: {0}")]
    BackupInvalid(String),

    /// A second `Transaction` was started while one was already live.
    #[error("a transaction is already in progress on this repository")]
    TransactionLockHeld,

    /// A batch operation (`ingest`/`prune`) collected one or more per-item failures.
    #[error(transparent)]
    Group(#[from] ErrorGroup),

    /// A STAC object is missing the inputs needed to compute its extent
    /// (an Item with no `bbox`/`geometry` or no `datetime`, or an empty
    /// Collection).
    #[error("stac object error: {0}")]
    StacObject(String),

    /// [`stac::Error`]: a STAC document is structurally invalid, or a
    /// Collection is missing the inputs needed to compute its extent.
    #[error(transparent)]
    Stac(#[from] stac::Error),

    /// [`stac_validate::Error`]: a STAC document failed schema validation.
    #[error(transparent)]
    Validate(#[from] stac_validate::Error),

    /// [`stac_io::Error`]: an href was out of scope, not found, or not JSON.
    #[error(transparent)]
    Io(#[from] stac_io::Error),

    /// [`std::io::Error`]: a raw filesystem operation (locking, journaling) failed.
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// [`serde_json::Error`]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [`git2::Error`]: the versioned backend's underlying git operation failed.
    #[error(transparent)]
    Git(#[from] git2::Error),
}

impl Error {
    /// Shorthand for a [`CatalogError::ParentNotFound`].
    pub fn parent_not_found(id: impl Into<String>) -> Error {
        CatalogError::ParentNotFound(id.into()).into()
    }

    /// Shorthand for a [`CatalogError::ParentIsItem`].
    pub fn parent_is_item(id: impl Into<String>) -> Error {
        CatalogError::ParentIsItem(id.into()).into()
    }
}
