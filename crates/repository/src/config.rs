use serde::{Deserialize, Serialize};

/// An author/committer identity, attached to versioned-backend commits.
///
/// Grounded in `original_source/stac_repository/git/git.py`'s `Signature`,
/// which parses `"Name <email>"` out of `git log` output; here it is
/// constructed directly rather than parsed, since we talk to `git2`
/// instead of shelling out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The display name.
    pub name: String,

    /// The email address.
    pub email: String,
}

impl Signature {
    /// Creates a new signature.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Signature {
        Signature {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Configuration accepted by the filesystem backend's `init`/`open`.
///
/// Out of scope per `spec.md` §1 is the TOML loader itself; this struct is
/// what that loader would construct and hand to `Repository::init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RepositoryConfig {
    /// Id of the root catalog document, used only at `init` time.
    pub id: Option<String>,

    /// Title of the root catalog document.
    pub title: Option<String>,

    /// Description of the root catalog document.
    pub description: Option<String>,

    /// Directory name patterns to skip during empty-directory pruning
    /// after a `commit` (`original_source`'s `ignore: [".cache"]`).
    pub ignore: Vec<String>,

    /// Whether `Transaction::catalog` should validate each cataloged
    /// product against its declared STAC schema before grafting it in.
    ///
    /// Schema validation is network-bound (`stac_validate` fetches schemas
    /// from `schemas.stacspec.org`), so it defaults to off; a caller backed
    /// by `MockIo`-based tests, or one that doesn't want ingestion to incur
    /// network latency, leaves this unset.
    pub validate: bool,
}

impl RepositoryConfig {
    /// Creates a config for a root catalog with the given id.
    pub fn new(id: impl Into<String>) -> RepositoryConfig {
        RepositoryConfig {
            id: Some(id.into()),
            ignore: default_ignore(),
            ..Default::default()
        }
    }

    /// Enables schema validation during `Transaction::catalog`.
    pub fn with_validation(mut self, validate: bool) -> RepositoryConfig {
        self.validate = validate;
        self
    }
}

fn default_ignore() -> Vec<String> {
    vec![".cache".to_string()]
}

/// Git LFS configuration for the versioned backend: an asset-size
/// threshold above which assets are staged through an LFS filter instead
/// of as plain blobs, plus the LFS remote url.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LfsConfig {
    /// Assets at or above this size, in bytes, are staged via LFS.
    pub threshold_bytes: u64,

    /// The LFS remote url written into `.gitattributes`/the LFS config.
    pub remote_url: String,
}

impl LfsConfig {
    /// Creates a new LFS configuration.
    pub fn new(threshold_bytes: u64, remote_url: impl Into<String>) -> LfsConfig {
        LfsConfig {
            threshold_bytes,
            remote_url: remote_url.into(),
        }
    }
}

/// Configuration accepted by the versioned (git) backend's `init`/`open`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub struct GitBackendConfig {
    /// Shared fields with the filesystem backend (root catalog id/title/description, ignore list).
    #[serde(flatten)]
    pub repository: RepositoryConfig,

    /// The signature used for commits made by this repository (the
    /// "committer"; callers may pass a distinct author signature per
    /// commit via [`crate::Transaction::commit_as`]).
    pub signature: Option<Signature>,

    /// Optional Git LFS threshold and remote.
    pub lfs: Option<LfsConfig>,
}

impl GitBackendConfig {
    /// Creates a config for a root catalog with the given id.
    pub fn new(id: impl Into<String>) -> GitBackendConfig {
        GitBackendConfig {
            repository: RepositoryConfig::new(id),
            signature: None,
            lfs: None,
        }
    }

    /// Sets the commit signature.
    pub fn with_signature(mut self, signature: Signature) -> GitBackendConfig {
        self.signature = Some(signature);
        self
    }

    /// Enables Git LFS for assets at or above `threshold_bytes`.
    pub fn with_lfs(mut self, threshold_bytes: u64, remote_url: impl Into<String>) -> GitBackendConfig {
        self.lfs = Some(LfsConfig::new(threshold_bytes, remote_url));
        self
    }

    /// Enables schema validation during `Transaction::catalog`.
    pub fn with_validation(mut self, validate: bool) -> GitBackendConfig {
        self.repository.validate = validate;
        self
    }
}
