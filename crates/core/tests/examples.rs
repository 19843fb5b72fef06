use stac::{Catalog, Collection, Item, Links, SelfHref, Value};

const ITEM: &str = r#"{
    "type": "Feature",
    "stac_version": "1.1.0",
    "id": "an-item",
    "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
    "bbox": [0.0, 0.0, 0.0, 0.0],
    "properties": {"datetime": "2024-01-01T00:00:00Z"},
    "links": [],
    "assets": {}
}"#;

const COLLECTION: &str = r#"{
    "type": "Collection",
    "stac_version": "1.1.0",
    "id": "a-collection",
    "description": "a description",
    "license": "other",
    "extent": {
        "spatial": {"bbox": [[0.0, 0.0, 1.0, 1.0]]},
        "temporal": {"interval": [["2024-01-01T00:00:00Z", "2024-06-01T00:00:00Z"]]}
    },
    "links": []
}"#;

const CATALOG: &str = r#"{
    "type": "Catalog",
    "stac_version": "1.1.0",
    "id": "a-catalog",
    "description": "a description",
    "links": []
}"#;

#[test]
fn item_round_trips_through_value() {
    let item: Item = serde_json::from_str(ITEM).unwrap();
    let value = Value::Item(item.clone());
    assert_eq!(value.id(), "an-item");
    let round_tripped: Item = value.try_into().unwrap();
    assert_eq!(round_tripped, item);
}

#[test]
fn collection_preserves_extent() {
    let collection: Collection = serde_json::from_str(COLLECTION).unwrap();
    assert_eq!(collection.extent.spatial.bbox[0], stac::Bbox::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn catalog_has_no_links_by_default() {
    let mut catalog: Catalog = serde_json::from_str(CATALOG).unwrap();
    assert!(catalog.links.is_empty());
    catalog.set_self_href("/repo/catalog.json");
    assert_eq!(catalog.self_href(), Some("/repo/catalog.json"));
}
