//! End-to-end scenarios against the filesystem backend, covering the
//! concrete walkthroughs and boundary behaviours laid out in `spec.md`
//! §8 ("Testable properties").

use stac::{Bbox, Catalog, Collection, Item, Links};
use stac_repository::{BackendConfig, CatalogError, CatalogOptions, Error, Repository, RepositoryConfig};
use tempfile::TempDir;

fn fs_config(id: &str) -> BackendConfig {
    BackendConfig::Fs(RepositoryConfig::new(id))
}

fn init(dir: &TempDir, id: &str) -> Repository {
    let base = dir.path().join("repo");
    let base = base.to_str().unwrap().to_string();
    Repository::init(base, Catalog::new(id, "a root catalog").into(), fs_config(id)).unwrap()
}

fn write_json(dir: &TempDir, name: &str, value: &serde_json::Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn item_with(id: &str, bbox: Bbox, datetime: &str) -> Item {
    let mut item = Item::new(id);
    item.bbox = Some(bbox);
    item.properties.datetime = Some(datetime.parse().unwrap());
    item
}

/// Scenario 1: init + single item.
#[test]
fn init_and_catalog_single_item() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());

    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog item A").unwrap();

    let head = repository.head().unwrap();
    let root = head.search("root").unwrap().unwrap().as_catalog().unwrap().clone();
    assert_eq!(root.item_links().count(), 1);
    let item_href = root.link("item").unwrap().href.clone();
    assert!(item_href.ends_with("A/A.json"));
    assert!(std::path::Path::new(&item_href).is_file());

    let found = head.search("A").unwrap().unwrap();
    assert_eq!(found.id(), "A");

    assert_eq!(repository.commits().unwrap().len(), 1);
}

/// Scenario 2: replacing a product by version bump via `ingest`.
#[test]
fn ingest_skips_identical_version_and_replaces_on_bump() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let mut item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    item.properties.version = Some("1".to_string());
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());

    let mut reports = Vec::new();
    repository
        .ingest(&[href.clone()], "passthrough", &CatalogOptions::new(), |r| reports.push(r.to_string()))
        .unwrap();
    assert_eq!(repository.commits().unwrap().len(), 1);

    // Same version: re-ingesting is a no-op skip, no new file content changes.
    let mut reports = Vec::new();
    repository
        .ingest(&[href.clone()], "passthrough", &CatalogOptions::new(), |r| reports.push(r.to_string()))
        .unwrap();
    assert!(reports.iter().any(|r| r.contains("skipped")));

    // Bump the version: triggers uncatalog-then-catalog.
    item.properties.version = Some("2".to_string());
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let mut reports = Vec::new();
    repository
        .ingest(&[href], "passthrough", &CatalogOptions::new(), |r| reports.push(r.to_string()))
        .unwrap();
    assert!(reports.iter().any(|r| r.contains("ok")));

    let head = repository.head().unwrap();
    let found = head.search("A").unwrap().unwrap().as_item().unwrap().clone();
    assert_eq!(found.version_field(), Some("2"));
    let root = head.search("root").unwrap().unwrap().as_catalog().unwrap().clone();
    assert_eq!(root.item_links().count(), 1);
}

/// Scenario 3: collection extent roll-up from two items.
#[test]
fn collection_extent_rolls_up_from_items() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let collection = Collection::new("C", "a collection");
    let href = write_json(&dir, "incoming-c.json", &serde_json::to_value(&collection).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog collection C").unwrap();

    let item1 = item_with("item1", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href1 = write_json(&dir, "incoming-item1.json", &serde_json::to_value(&item1).unwrap());
    let item2 = item_with("item2", Bbox::new(2.0, 2.0, 3.0, 3.0), "2024-06-01T00:00:00Z");
    let href2 = write_json(&dir, "incoming-item2.json", &serde_json::to_value(&item2).unwrap());

    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href1, &CatalogOptions::new().with_parent("C")).unwrap();
    transaction.catalog(&href2, &CatalogOptions::new().with_parent("C")).unwrap();
    transaction.commit("catalog two items under C").unwrap();

    let head = repository.head().unwrap();
    let collection = head.search("C").unwrap().unwrap().as_collection().unwrap().clone();
    assert_eq!(collection.extent.spatial.bbox[0], Bbox::new(0.0, 0.0, 3.0, 3.0));
    assert_eq!(collection.extent.spatial.bbox.len(), 3);
    let overall_interval = collection.extent.temporal.interval[0];
    assert_eq!(overall_interval[0], Some("2024-01-01T00:00:00Z".parse().unwrap()));
    assert_eq!(overall_interval[1], Some("2024-06-01T00:00:00Z".parse().unwrap()));
    assert_eq!(collection.item_links().count(), 2);
}

/// Scenario 4: pruning a leaf recomputes the parent's extent.
#[test]
fn prune_leaf_recomputes_extent() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let collection = Collection::new("C", "a collection");
    let href = write_json(&dir, "incoming-c.json", &serde_json::to_value(&collection).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog collection C").unwrap();

    let item1 = item_with("item1", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href1 = write_json(&dir, "incoming-item1.json", &serde_json::to_value(&item1).unwrap());
    let item2 = item_with("item2", Bbox::new(2.0, 2.0, 3.0, 3.0), "2024-06-01T00:00:00Z");
    let href2 = write_json(&dir, "incoming-item2.json", &serde_json::to_value(&item2).unwrap());

    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href1, &CatalogOptions::new().with_parent("C")).unwrap();
    transaction.catalog(&href2, &CatalogOptions::new().with_parent("C")).unwrap();
    transaction.commit("catalog two items under C").unwrap();

    let mut reports = Vec::new();
    repository.prune(&["item1".to_string()], |r| reports.push(r.to_string())).unwrap();
    assert!(reports.iter().all(|r| r.contains("ok")));

    let head = repository.head().unwrap();
    assert!(head.search("item1").unwrap().is_none());
    let collection = head.search("C").unwrap().unwrap().as_collection().unwrap().clone();
    assert_eq!(collection.extent.spatial.bbox[0], Bbox::new(2.0, 2.0, 3.0, 3.0));
    assert_eq!(collection.item_links().count(), 1);
}

/// Scenario 5: cataloging under a missing parent fails and leaves no trace.
#[test]
fn catalog_under_missing_parent_fails_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());

    let transaction = repository.transaction().unwrap();
    let result = transaction.catalog(&href, &CatalogOptions::new().with_parent("missing"));
    assert!(matches!(result, Err(Error::Catalog(CatalogError::ParentNotFound(id))) if id == "missing"));
    transaction.abort().unwrap();

    let head = repository.head().unwrap();
    assert!(head.search("A").unwrap().is_none());
    let root = head.search("root").unwrap().unwrap().as_catalog().unwrap().clone();
    assert!(root.item_links().count() == 0 && root.child_links().count() == 0);
}

/// B1: cataloging under an Item fails with `parent-is-item`.
#[test]
fn catalog_under_item_fails() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let leaf = item_with("leaf", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-leaf.json", &serde_json::to_value(&leaf).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog leaf").unwrap();

    let other = item_with("other", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-other.json", &serde_json::to_value(&other).unwrap());
    let transaction = repository.transaction().unwrap();
    let result = transaction.catalog(&href, &CatalogOptions::new().with_parent("leaf"));
    assert!(matches!(result, Err(Error::Catalog(CatalogError::ParentIsItem(id))) if id == "leaf"));
}

/// B2: uncataloging the root fails.
#[test]
fn uncatalog_root_fails() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");
    let transaction = repository.transaction().unwrap();
    let result = transaction.uncatalog("root");
    assert!(matches!(result, Err(Error::Uncatalog(stac_repository::UncatalogError::Root))));
}

/// B4: a second transaction cannot start while one is already live.
#[test]
fn second_transaction_while_one_live_fails() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");
    let _first = repository.transaction().unwrap();
    let second = repository.transaction();
    assert!(matches!(second, Err(Error::TransactionLockHeld)));
}

/// B3: abort after catalog/uncatalog leaves the backend bit-identical to
/// the pre-transaction commit.
#[test]
fn abort_restores_pre_transaction_state() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog A").unwrap();

    let before = repository.head().unwrap().search("root").unwrap().unwrap().as_catalog().unwrap().item_links().count();

    let item2 = item_with("B", Bbox::new(5.0, 5.0, 6.0, 6.0), "2024-02-01T00:00:00Z");
    let href2 = write_json(&dir, "incoming-b.json", &serde_json::to_value(&item2).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href2, &CatalogOptions::new()).unwrap();
    transaction.abort().unwrap();

    let after = repository.head().unwrap().search("root").unwrap().unwrap().as_catalog().unwrap().item_links().count();
    assert_eq!(before, after);
    assert!(repository.head().unwrap().search("B").unwrap().is_none());
}

/// R1: catalog then uncatalog returns the tree to its prior shape.
#[test]
fn catalog_then_uncatalog_is_a_round_trip() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let before_count = repository.head().unwrap().search("root").unwrap().unwrap().as_catalog().unwrap().item_links().count();

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog A").unwrap();

    repository.prune(&["A".to_string()], |_| {}).unwrap();

    let after_count = repository.head().unwrap().search("root").unwrap().unwrap().as_catalog().unwrap().item_links().count();
    assert_eq!(before_count, after_count);
    assert!(repository.head().unwrap().search("A").unwrap().is_none());
}

/// `Repository::commits_for` returns only commits whose tree once held the id.
#[test]
fn commits_for_filters_by_id() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog A").unwrap();

    // The filesystem backend has history depth 1: only the current head is visible.
    let commits = repository.commits_for("A").unwrap();
    assert_eq!(commits.len(), 1);
    let commits = repository.commits_for("nonexistent").unwrap();
    assert!(commits.is_empty());
}

/// `export` materialises a commit's tree into a standalone directory.
#[test]
fn export_materialises_self_contained_catalog() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");

    let item = item_with("A", Bbox::new(0.0, 0.0, 1.0, 1.0), "2024-01-01T00:00:00Z");
    let href = write_json(&dir, "incoming-a.json", &serde_json::to_value(&item).unwrap());
    let transaction = repository.transaction().unwrap();
    transaction.catalog(&href, &CatalogOptions::new()).unwrap();
    transaction.commit("catalog A").unwrap();

    let export_dir = TempDir::new().unwrap();
    repository.head().unwrap().export(export_dir.path()).unwrap();
    assert!(export_dir.path().join("catalog.json").is_file());
    assert!(export_dir.path().join("A").join("A.json").is_file());
}

/// `rollback`/`backup` are not supported on the filesystem backend.
#[test]
fn rollback_and_backup_not_supported_on_fs_backend() {
    let dir = TempDir::new().unwrap();
    let repository = init(&dir, "root");
    let head = repository.head().unwrap();
    assert!(matches!(head.rollback(), Err(Error::NotSupported(_))));
    let backup_dir = TempDir::new().unwrap();
    assert!(matches!(head.backup(backup_dir.path()), Err(Error::NotSupported(_))));
}

/// `init` refuses to run against an already-populated base href.
#[test]
fn init_refuses_nonempty_base() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("repo");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("unrelated.txt"), b"hi").unwrap();
    let result = Repository::init(base.to_str().unwrap().to_string(), Catalog::new("root", "d").into(), fs_config("root"));
    assert!(matches!(result, Err(Error::AlreadyInitialized(_))));
}

/// `open` fails against a directory with no repository marker.
#[test]
fn open_fails_without_marker() {
    let dir = TempDir::new().unwrap();
    let result = Repository::open(dir.path().to_str().unwrap().to_string(), fs_config("root"));
    assert!(matches!(result, Err(Error::RepositoryNotFound(_))));
}
