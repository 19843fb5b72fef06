use crate::Result;
use std::io::Read;

/// An asset's bytes, as a streaming, scope-checked reader.
///
/// Boxed so that [Readable::get_asset] can return either a file handle, a
/// network response body, or an in-memory cursor without the trait needing
/// a generic associated type.
pub type AssetReader = Box<dyn Read + Send>;

/// Read-only access to STAC documents and asset bytes, keyed by href.
///
/// Implemented by every IO backend (filesystem, versioned-store, mock).
/// [crate::Commit] requires only this half of the capability; [Writable]
/// extends it for [crate::Transaction].
pub trait Readable {
    /// Fetches and parses the STAC JSON document at `href`.
    ///
    /// Fails with [crate::Error::OutOfScope] if `href` isn't covered by a
    /// `read-stac` rule, [crate::Error::NotFound] if nothing is there, or
    /// [crate::Error::MalformedJson] if the bytes aren't valid JSON.
    fn get(&self, href: &str) -> Result<serde_json::Value>;

    /// Opens a streaming reader over the asset bytes at `href`.
    ///
    /// Never buffers the whole asset in memory; the returned reader should
    /// be drained (or dropped) promptly, since some implementations hold a
    /// resource (an open file, a response body) for its lifetime.
    fn get_asset(&self, href: &str) -> Result<AssetReader>;
}

/// Read/write access to STAC documents and asset bytes, keyed by href.
pub trait Writable: Readable {
    /// Writes a STAC JSON document at `href`.
    fn put(&self, href: &str, value: &serde_json::Value) -> Result<()>;

    /// Streams `reader` to the asset at `href`, without buffering it whole.
    fn put_asset(&self, href: &str, reader: &mut dyn Read) -> Result<()>;

    /// Removes whatever is at `href` (document or asset).
    ///
    /// Not an error if nothing was there.
    fn delete(&self, href: &str) -> Result<()>;
}
