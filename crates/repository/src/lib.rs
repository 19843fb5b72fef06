//! A versioned repository engine for spatiotemporal asset catalog (STAC)
//! trees.
//!
//! A [Repository] wraps one of two reference storage backends — a plain
//! filesystem tree, or a git-versioned working tree — behind a single
//! API: open a [Transaction], `catalog`/`uncatalog` products into the
//! tree, and `commit` or `abort`. Past state is visible through
//! read-only [Commit] views, looked up by id, ref, or walked via
//! [`Commit::parent`].
//!
//! ```no_run
//! use stac_repository::{BackendConfig, CatalogOptions, Repository, RepositoryConfig};
//!
//! let config = BackendConfig::Fs(RepositoryConfig::new("root"));
//! let repository = Repository::open("/data/catalog", config)?;
//! let transaction = repository.transaction()?;
//! transaction.catalog("/data/incoming/scene/item.json", &CatalogOptions::new())?;
//! transaction.commit("catalog one scene")?;
//! # Ok::<(), stac_repository::Error>(())
//! ```

#![deny(
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    missing_debug_implementations,
    missing_docs,
    non_ascii_idents,
    noop_method_call,
    rust_2021_incompatible_closure_captures,
    rust_2021_incompatible_or_patterns,
    rust_2021_prefixes_incompatible_syntax,
    rust_2021_prelude_collisions,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]

mod backend;
mod commit;
mod config;
mod error;
mod job_report;
mod processor;
mod repository;
mod transaction;
mod tree;

pub use backend::{Backend, BackendConfig, CommitIo, CommitMeta, TransactionIo};
pub use commit::Commit;
pub use config::{GitBackendConfig, LfsConfig, RepositoryConfig, Signature};
pub use error::{CatalogError, Error, ErrorGroup, ErrorGroupEntry, Result, UncatalogError};
pub use job_report::{JobOutcome, JobReport, JobStage};
pub use processor::{builtin_processor, Passthrough, Processor};
pub use repository::Repository;
pub use transaction::{CatalogOptions, Transaction};
