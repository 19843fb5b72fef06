use crate::io::AssetReader;
use crate::{Error, Permission, Readable, Result, Scope, Writable};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// The default, local-filesystem [Readable]/[Writable] IO.
///
/// `get`/`get_asset` read files directly. `put` writes via a temporary
/// sibling file, `fsync`s it, then atomically renames it into place, so
/// that a crash mid-write never leaves a torn document on disk. `delete`
/// unlinks the target.
#[derive(Debug, Clone)]
pub struct FilesystemIo {
    scope: Scope,
}

impl FilesystemIo {
    /// Creates a filesystem IO rooted at `base_path`, with full read/write
    /// access under it and nothing else.
    pub fn new(base_path: impl Into<String>) -> FilesystemIo {
        FilesystemIo {
            scope: Scope::new(base_path),
        }
    }

    /// Creates a filesystem IO from a caller-configured [Scope], e.g. one
    /// that also allows reading out-of-scope hrefs for ingestion.
    pub fn with_scope(scope: Scope) -> FilesystemIo {
        FilesystemIo { scope }
    }

    /// Returns this IO's scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn path(&self, href: &str) -> Result<PathBuf> {
        if let Some(rest) = href.strip_prefix("file://") {
            Ok(PathBuf::from(rest))
        } else if href.starts_with("http://") || href.starts_with("https://") {
            Err(Error::UnsupportedHref(href.to_string()))
        } else {
            Ok(PathBuf::from(href))
        }
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut os_string = path.as_os_str().to_owned();
        os_string.push(".tmp");
        PathBuf::from(os_string)
    }

    fn not_found_aware(href: &str, error: io::Error) -> Error {
        if error.kind() == io::ErrorKind::NotFound {
            Error::NotFound(href.to_string())
        } else {
            error.into()
        }
    }
}

impl Readable for FilesystemIo {
    fn get(&self, href: &str) -> Result<serde_json::Value> {
        self.scope.check(href, Permission::ReadStac)?;
        let path = self.path(href)?;
        tracing::debug!(href, "reading stac document");
        let bytes = fs::read(&path).map_err(|error| Self::not_found_aware(href, error))?;
        serde_json::from_slice(&bytes).map_err(|source| Error::MalformedJson {
            href: href.to_string(),
            source,
        })
    }

    fn get_asset(&self, href: &str) -> Result<AssetReader> {
        self.scope.check(href, Permission::ReadAsset)?;
        let path = self.path(href)?;
        tracing::debug!(href, "opening asset");
        let file = File::open(&path).map_err(|error| Self::not_found_aware(href, error))?;
        Ok(Box::new(file))
    }
}

impl Writable for FilesystemIo {
    fn put(&self, href: &str, value: &serde_json::Value) -> Result<()> {
        self.scope.check(href, Permission::WriteStac)?;
        let path = self.path(href)?;
        tracing::debug!(href, "writing stac document");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = Self::temp_path(&path);
        let bytes = serde_json::to_vec_pretty(value)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn put_asset(&self, href: &str, reader: &mut dyn Read) -> Result<()> {
        self.scope.check(href, Permission::WriteAsset)?;
        let path = self.path(href)?;
        tracing::debug!(href, "streaming asset");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = Self::temp_path(&path);
        {
            let mut file = File::create(&temp_path)?;
            io::copy(reader, &mut file)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn delete(&self, href: &str) -> Result<()> {
        self.scope.check(href, Permission::WriteStac)?;
        let path = self.path(href)?;
        tracing::debug!(href, "deleting");
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrips_a_document() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        let href = format!("{}/catalog.json", dir.path().to_str().unwrap());
        io.put(&href, &serde_json::json!({"id": "root"})).unwrap();
        let value = io.get(&href).unwrap();
        assert_eq!(value["id"], "root");
    }

    #[test]
    fn put_is_atomic_no_partial_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        let href = format!("{}/catalog.json", dir.path().to_str().unwrap());
        io.put(&href, &serde_json::json!({"id": "root"})).unwrap();
        assert!(!FilesystemIo::temp_path(&PathBuf::from(&href)).exists());
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        let href = format!("{}/missing.json", dir.path().to_str().unwrap());
        assert!(matches!(io.get(&href), Err(Error::NotFound(_))));
    }

    #[test]
    fn out_of_scope_write_is_rejected() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        assert!(matches!(
            io.put("/etc/not-allowed.json", &serde_json::json!({})),
            Err(Error::OutOfScope { .. })
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        let href = format!("{}/catalog.json", dir.path().to_str().unwrap());
        io.delete(&href).unwrap();
        io.put(&href, &serde_json::json!({"id": "root"})).unwrap();
        io.delete(&href).unwrap();
        io.delete(&href).unwrap();
        assert!(matches!(io.get(&href), Err(Error::NotFound(_))));
    }

    #[test]
    fn get_asset_streams() {
        let dir = TempDir::new().unwrap();
        let io = FilesystemIo::new(dir.path().to_str().unwrap());
        let href = format!("{}/data.tif", dir.path().to_str().unwrap());
        io.put_asset(&href, &mut io::Cursor::new(b"asset bytes"))
            .unwrap();
        let mut reader = io.get_asset(&href).unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"asset bytes");
    }
}
