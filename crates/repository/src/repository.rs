//! Repository lifecycle (`spec.md` §4.5): `init`/`open`, commit history,
//! and the batch `ingest`/`prune` drivers.

use crate::backend::{Backend, BackendConfig};
use crate::commit::Commit;
use crate::error::{Error, ErrorGroup, Result};
use crate::job_report::{JobOutcome, JobReport, JobStage};
use crate::processor::{builtin_processor, Processor};
use crate::transaction::{CatalogOptions, Transaction};
use crate::tree;
use stac::Value;
use stac_io::{FilesystemIo, Permission, Readable, Scope, Writable};
use std::path::PathBuf;

/// A versioned repository of STAC trees, bound to one of the two
/// reference backends.
#[derive(Debug, Clone)]
pub struct Repository {
    backend: Backend,
}

impl Repository {
    /// Creates a fresh repository at `base_href`, writing `root_catalog`
    /// as `catalog.json`. Fails `already-initialised` if `base_href`
    /// already holds anything.
    pub fn init(base_href: impl Into<String>, root_catalog: Value, config: BackendConfig) -> Result<Repository> {
        let base_dir = PathBuf::from(base_href.into());
        let backend = config.into_backend(&base_dir);
        if backend.is_nonempty()? {
            return Err(Error::AlreadyInitialized(base_dir.display().to_string()));
        }

        let catalog_href = backend.catalog_href();
        let mut root_catalog = root_catalog;
        root_catalog.set_self_href(&catalog_href);
        let json = serde_json::to_value(&root_catalog).map_err(stac::Error::from)?;

        match &backend {
            Backend::Fs(fs) => {
                std::fs::create_dir_all(fs.base_dir())?;
                let io = FilesystemIo::new(fs.base_dir().to_string_lossy().into_owned());
                io.put(&catalog_href, &json)?;
            }
            Backend::Git(git) => {
                let _ = git.init(&json)?;
            }
        }
        Ok(Repository { backend })
    }

    /// Binds to an existing repository at `base_href`. Fails `not-found`
    /// if no `catalog.json`/backend marker is present. Runs crash
    /// recovery before returning.
    pub fn open(base_href: impl Into<String>, config: BackendConfig) -> Result<Repository> {
        let base_dir = PathBuf::from(base_href.into());
        let backend = config.into_backend(&base_dir);
        if !backend.exists() {
            return Err(Error::RepositoryNotFound(base_dir.display().to_string()));
        }
        backend.recover()?;
        Ok(Repository { backend })
    }

    /// Opens a new Transaction rooted at the current head, acquiring the
    /// single-writer lock. Fails `transaction-lock-held` if one is already live.
    pub fn transaction(&self) -> Result<Transaction> {
        Transaction::new(self.backend.clone())
    }

    /// A read-only [`Commit`] view of the current head (`spec.md` §4.3's
    /// `Commit(repository)` construction form, with no explicit id).
    pub fn head(&self) -> Result<Commit> {
        Commit::head(self.backend.clone())
    }

    /// The full commit history, most recent first.
    pub fn commits(&self) -> Result<Vec<Commit>> {
        self.backend
            .history()?
            .into_iter()
            .map(|meta| Commit::from_meta(self.backend.clone(), meta))
            .collect()
    }

    /// The subsequence of [`Repository::commits`] whose tree contains (or
    /// once contained) an object with the given id.
    pub fn commits_for(&self, id: &str) -> Result<Vec<Commit>> {
        self.commits()?
            .into_iter()
            .map(|commit| Ok((commit.search(id)?.is_some(), commit)))
            .collect::<Result<Vec<_>>>()
            .map(|tagged| tagged.into_iter().filter(|(matched, _)| *matched).map(|(_, commit)| commit).collect())
    }

    /// Resolves a commit reference (`spec.md` §6): a prefix of a commit
    /// id, a non-positive head-relative integer, or an ISO-8601 timestamp.
    pub fn get_commit(&self, r#ref: &str) -> Result<Commit> {
        let meta = self.backend.resolve_ref(r#ref)?;
        Commit::from_meta(self.backend.clone(), meta)
    }

    fn source_reader() -> FilesystemIo {
        // Ingestion sources are an external collaborator's business (`spec.md`
        // §1); the processor is trusted to read whatever it's given, but
        // never to write through this handle.
        FilesystemIo::with_scope(Scope::new("").allow("", [Permission::ReadStac, Permission::ReadAsset]))
    }

    /// Drives a Transaction that discovers products under `sources` via
    /// the processor registered as `processor_id`, catalogs each one, and
    /// commits once all have been attempted. Already-cataloged products
    /// with an identical version are skipped; a version bump triggers
    /// `uncatalog` then `catalog`. Per-product failures are collected and
    /// surfaced as an `ErrorGroup` once the transaction has exited.
    pub fn ingest<F: FnMut(JobReport)>(
        &self,
        sources: &[String],
        processor_id: &str,
        options: &CatalogOptions,
        on_report: F,
    ) -> Result<()> {
        let processor = builtin_processor(processor_id)?;
        self.ingest_with(sources, processor.as_ref(), options, on_report)
    }

    /// As [`Repository::ingest`], but driven by a caller-supplied
    /// [`Processor`] rather than one of the built-in ids. The processor
    /// registry itself is an external collaborator's concern (`spec.md`
    /// §1); this is the seam that lets a caller plug one in.
    pub fn ingest_with<F: FnMut(JobReport)>(
        &self,
        sources: &[String],
        processor: &dyn Processor,
        options: &CatalogOptions,
        mut on_report: F,
    ) -> Result<()> {
        let reader = Self::source_reader();
        let transaction = self.transaction()?;
        let mut errors = ErrorGroup::new();

        let mut discovered = Vec::new();
        for source in sources {
            match processor.discover(source, &reader) {
                Ok(products) => discovered.extend(products),
                Err(error) => errors.push(source.clone(), error),
            }
        }

        for product_source in discovered {
            match Self::ingest_one(&transaction, processor, &reader, &product_source, options) {
                Ok(skipped) => {
                    let outcome = if skipped { JobOutcome::Skipped } else { JobOutcome::Success };
                    on_report(JobReport::new(product_source, JobStage::Ingest, outcome));
                }
                Err(error) => {
                    on_report(JobReport::new(
                        product_source.clone(),
                        JobStage::Ingest,
                        JobOutcome::Failure(error.to_string()),
                    ));
                    errors.push(product_source, error);
                }
            }
        }

        Self::finish(transaction, "ingest", errors)
    }

    fn ingest_one(
        transaction: &Transaction,
        processor: &dyn Processor,
        reader: &dyn Readable,
        product_source: &str,
        options: &CatalogOptions,
    ) -> Result<bool> {
        let product_id = processor.id(product_source, reader)?;
        let version = processor.version(product_source, reader)?;
        if let Some(existing) = transaction.search(&product_id)? {
            if tree::get_version(&existing).as_deref() == Some(version.as_str()) {
                return Ok(true);
            }
        }
        let product_href = processor.process(product_source, reader)?;
        transaction.catalog(&product_href, options)?;
        Ok(false)
    }

    /// Drives a Transaction that calls `uncatalog` on each of `product_ids`,
    /// collecting errors the same way [`Repository::ingest`] does.
    pub fn prune<F: FnMut(JobReport)>(&self, product_ids: &[String], mut on_report: F) -> Result<()> {
        let transaction = self.transaction()?;
        let mut errors = ErrorGroup::new();

        for id in product_ids {
            match transaction.uncatalog(id) {
                Ok(()) => on_report(JobReport::new(id.clone(), JobStage::Prune, JobOutcome::Success)),
                Err(error) => {
                    on_report(JobReport::new(id.clone(), JobStage::Prune, JobOutcome::Failure(error.to_string())));
                    errors.push(id.clone(), error);
                }
            }
        }

        Self::finish(transaction, "prune", errors)
    }

    fn finish(transaction: Transaction, message: &str, errors: ErrorGroup) -> Result<()> {
        match transaction.commit(message) {
            Ok(_) => errors.into_result(),
            Err(error) => {
                let _ = transaction.abort();
                Err(error)
            }
        }
    }
}
