use crate::{Asset, Assets, Bbox, Fields, Link, Links, STAC_VERSION, Version};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use stac_derive::{Links, SelfHref};

const ITEM_TYPE: &str = "Feature";

fn item_type() -> String {
    ITEM_TYPE.to_string()
}

fn deserialize_item_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != ITEM_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &ITEM_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// An `Item` is a [GeoJSON](https://geojson.org/) Feature augmented with
/// foreign members relevant to a STAC object.
///
/// These include fields that identify the time range and space covered by
/// the `Item`. An `Item` is the core granular entity in a STAC `Catalog` or
/// `Collection`, containing the actual data referenced, along with
/// [Asset](crate::Asset)s to allow access to that data.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SelfHref, Links)]
pub struct Item {
    #[serde(default = "item_type", deserialize_with = "deserialize_item_type")]
    r#type: String,

    /// The STAC version the `Item` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Item` implements.
    #[serde(rename = "stac_extensions")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Provider identifier, unique within the STAC catalog/collection this
    /// `Item` is part of.
    #[serde(default)]
    pub id: String,

    /// Defines the full footprint of the asset represented by this item,
    /// formatted according to [RFC 7946, section
    /// 3.1](https://tools.ietf.org/html/rfc7946#section-3.1). The footprint
    /// should be the default GeoJSON geometry, though additional geometries
    /// can be included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<geojson::Geometry>,

    /// Bounding box of the asset represented by this `Item`, formatted
    /// according to [RFC 7946, section
    /// 5](https://tools.ietf.org/html/rfc7946#section-5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,

    /// A dictionary of additional metadata for the `Item`.
    #[serde(default)]
    pub properties: Properties,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Dictionary of asset objects that can be downloaded, each with a unique key.
    #[serde(default)]
    pub assets: IndexMap<String, Asset>,

    /// The `id` of the STAC [Collection](crate::Collection) this `Item`
    /// references to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(skip)]
    self_href: Option<String>,
}

/// Additional metadata fields can be added to the GeoJSON Object Properties.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Properties {
    /// The searchable date and time of the assets, in UTC.
    ///
    /// `null` if, and only if, both `start_datetime` and `end_datetime` are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,

    /// The first or start date and time for the `Item`, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,

    /// The last or end date and time for the `Item`, in UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,

    /// A version string identifying this particular revision of the `Item`'s data.
    ///
    /// Not part of the core STAC specification (it comes from the
    /// [Version extension](https://github.com/stac-extensions/version)), but
    /// used throughout this crate to identify already-cataloged revisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Additional fields on the properties.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Item {
    /// Creates a new `Item` with the given `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// let item = Item::new("an-id");
    /// assert_eq!(item.id, "an-id");
    /// ```
    pub fn new(id: impl ToString) -> Item {
        Item {
            r#type: item_type(),
            version: STAC_VERSION,
            extensions: Vec::new(),
            id: id.to_string(),
            geometry: None,
            bbox: None,
            properties: Properties::default(),
            links: Vec::new(),
            assets: IndexMap::new(),
            collection: None,
            self_href: None,
        }
    }

    /// Returns this item's effective `(start, end)` datetimes.
    ///
    /// If only `datetime` is set, `start == end == datetime`. If
    /// `start_datetime`/`end_datetime` are set, those are used instead
    /// (either may be `None`, meaning unbounded on that side).
    pub fn datetimes(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        if self.properties.start_datetime.is_some() || self.properties.end_datetime.is_some() {
            (
                self.properties.start_datetime,
                self.properties.end_datetime,
            )
        } else {
            (self.properties.datetime, self.properties.datetime)
        }
    }

    /// Returns this item's declared version, from the
    /// [Version extension](https://github.com/stac-extensions/version)
    /// convention of a `version` property.
    pub fn version_field(&self) -> Option<&str> {
        self.properties.version.as_deref()
    }
}

impl Assets for Item {
    fn assets(&self) -> &IndexMap<String, Asset> {
        &self.assets
    }
    fn assets_mut(&mut self) -> &mut IndexMap<String, Asset> {
        &mut self.assets
    }
}

impl Fields for Item {
    fn fields(&self) -> &Map<String, Value> {
        &self.properties.additional_fields
    }
    fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties.additional_fields
    }
}

#[cfg(test)]
mod tests {
    use super::Item;
    use crate::STAC_VERSION;

    #[test]
    fn new() {
        let item = Item::new("an-id");
        assert_eq!(item.id, "an-id");
        assert!(item.geometry.is_none());
        assert!(item.bbox.is_none());
        assert!(item.links.is_empty());
        assert!(item.assets.is_empty());
        assert_eq!(item.version, STAC_VERSION);
    }

    #[test]
    fn datetimes_from_datetime() {
        let mut item = Item::new("an-id");
        let dt = "2020-01-01T00:00:00Z".parse().unwrap();
        item.properties.datetime = Some(dt);
        assert_eq!(item.datetimes(), (Some(dt), Some(dt)));
    }

    #[test]
    fn datetimes_from_range() {
        let mut item = Item::new("an-id");
        let start = "2020-01-01T00:00:00Z".parse().unwrap();
        let end = "2020-12-31T00:00:00Z".parse().unwrap();
        item.properties.start_datetime = Some(start);
        item.properties.end_datetime = Some(end);
        assert_eq!(item.datetimes(), (Some(start), Some(end)));
    }

    #[test]
    fn has_type() {
        let value = serde_json::to_value(Item::new("an-id")).unwrap();
        assert_eq!(value["type"], "Feature");
    }
}
