use thiserror::Error;

/// Crate-specific error enum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The href is outside every scope rule permitting the requested
    /// permission.
    #[error("href {href} is out of scope for {operation}")]
    OutOfScope {
        /// The href that was requested.
        href: String,

        /// The permission that was required.
        operation: &'static str,
    },

    /// No object or asset exists at the given href.
    #[error("not found: {0}")]
    NotFound(String),

    /// The bytes at an href did not parse as JSON.
    #[error("malformed json at {href}: {source}")]
    MalformedJson {
        /// The href that was read.
        href: String,

        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// This backend does not support reading from, or writing to, this kind
    /// of href at all (e.g. a non-`file://` scheme on [FilesystemIo](crate::FilesystemIo)).
    #[error("unsupported href for this io: {0}")]
    UnsupportedHref(String),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// [stac::Error]
    #[error(transparent)]
    Stac(#[from] stac::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}
