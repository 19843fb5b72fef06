use crate::io::AssetReader;
use crate::{Error, Permission, Readable, Result, Scope, Writable};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

/// An in-memory [Readable]/[Writable] implementation.
///
/// Backs tests that exercise navigation, `Transaction`, and `Repository`
/// logic without touching the filesystem. Cheap to [Clone]: clones share
/// the same backing store, so one [MockIo] can be handed to a reader and a
/// writer that are meant to see each other's writes.
#[derive(Debug, Clone)]
pub struct MockIo {
    scope: Scope,
    documents: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockIo {
    /// Creates an empty mock IO rooted at `base_href`.
    pub fn new(base_href: impl Into<String>) -> MockIo {
        MockIo {
            scope: Scope::new(base_href),
            documents: Arc::new(Mutex::new(HashMap::new())),
            assets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a mock IO from a caller-configured [Scope].
    pub fn with_scope(scope: Scope) -> MockIo {
        MockIo {
            scope,
            documents: Arc::new(Mutex::new(HashMap::new())),
            assets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns this IO's scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns `true` if a document or asset is stored at `href`.
    pub fn contains(&self, href: &str) -> bool {
        self.documents.lock().unwrap().contains_key(href)
            || self.assets.lock().unwrap().contains_key(href)
    }
}

impl Readable for MockIo {
    fn get(&self, href: &str) -> Result<serde_json::Value> {
        self.scope.check(href, Permission::ReadStac)?;
        self.documents
            .lock()
            .unwrap()
            .get(href)
            .cloned()
            .ok_or_else(|| Error::NotFound(href.to_string()))
    }

    fn get_asset(&self, href: &str) -> Result<AssetReader> {
        self.scope.check(href, Permission::ReadAsset)?;
        let bytes = self
            .assets
            .lock()
            .unwrap()
            .get(href)
            .cloned()
            .ok_or_else(|| Error::NotFound(href.to_string()))?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}

impl Writable for MockIo {
    fn put(&self, href: &str, value: &serde_json::Value) -> Result<()> {
        self.scope.check(href, Permission::WriteStac)?;
        let _ = self
            .documents
            .lock()
            .unwrap()
            .insert(href.to_string(), value.clone());
        Ok(())
    }

    fn put_asset(&self, href: &str, reader: &mut dyn Read) -> Result<()> {
        self.scope.check(href, Permission::WriteAsset)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let _ = self.assets.lock().unwrap().insert(href.to_string(), bytes);
        Ok(())
    }

    fn delete(&self, href: &str) -> Result<()> {
        self.scope.check(href, Permission::WriteStac)?;
        let _ = self.documents.lock().unwrap().remove(href);
        let _ = self.assets.lock().unwrap().remove(href);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips() {
        let io = MockIo::new("/repo");
        io.put("/repo/catalog.json", &serde_json::json!({"id": "root"}))
            .unwrap();
        assert_eq!(io.get("/repo/catalog.json").unwrap()["id"], "root");
    }

    #[test]
    fn clones_share_storage() {
        let io = MockIo::new("/repo");
        let clone = io.clone();
        io.put("/repo/catalog.json", &serde_json::json!({"id": "root"}))
            .unwrap();
        assert!(clone.contains("/repo/catalog.json"));
    }

    #[test]
    fn missing_asset_is_not_found() {
        let io = MockIo::new("/repo");
        assert!(matches!(
            io.get_asset("/repo/data.tif"),
            Err(Error::NotFound(_))
        ));
    }
}
