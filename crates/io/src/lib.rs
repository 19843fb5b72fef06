//! Scoped, capability-based IO for reading and writing STAC catalogs.
//!
//! An href is anything that locates a STAC object or asset: a plain
//! filesystem path, or a URI. This crate doesn't care which — it only
//! cares whether the href is permitted, by a [Scope], for the operation
//! being attempted.
//!
//! Two capabilities are exposed as traits: [Readable] (`get`/`get_asset`)
//! and [Writable] (`put`/`put_asset`/`delete`, which extends `Readable`).
//! `stac-repository`'s `Commit` only needs `Readable`; its `Transaction`
//! needs `Writable`. The same navigation code runs against whichever
//! implementation is handed to it:
//!
//! - [FilesystemIo], the default, backed by the local filesystem.
//! - [MockIo], an in-memory implementation for tests.
//!
//! ```
//! use stac_io::{FilesystemIo, Readable, Writable};
//! use tempfile::TempDir;
//!
//! let dir = TempDir::new().unwrap();
//! let io = FilesystemIo::new(dir.path().to_str().unwrap());
//! let href = format!("{}/catalog.json", dir.path().to_str().unwrap());
//! io.put(&href, &serde_json::json!({"id": "root", "type": "Catalog"})).unwrap();
//! assert_eq!(io.get(&href).unwrap()["id"], "root");
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

mod error;
mod fs;
mod io;
mod mock;
mod scope;

pub use error::Error;
pub use fs::FilesystemIo;
pub use io::{AssetReader, Readable, Writable};
pub use mock::MockIo;
pub use scope::{Permission, Scope};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
