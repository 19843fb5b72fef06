use crate::{Link, STAC_VERSION, Version};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use stac_derive::{Fields, Links, SelfHref};

const CATALOG_TYPE: &str = "Catalog";

fn catalog_type() -> String {
    CATALOG_TYPE.to_string()
}

fn deserialize_catalog_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let r#type = String::deserialize(deserializer)?;
    if r#type != CATALOG_TYPE {
        Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&r#type),
            &CATALOG_TYPE,
        ))
    } else {
        Ok(r#type)
    }
}

/// A STAC `Catalog` object represents a logical group of other `Catalog`,
/// `Collection`, and `Item` objects.
///
/// These `Item`s can be linked to directly from a `Catalog`, or the
/// `Catalog` can link to other `Catalog` or `Collection` objects that
/// further link to `Item`s. The division of sub-catalogs is up to the
/// implementor, but is generally done to aid the ease of online browsing by
/// people.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, SelfHref, Links, Fields)]
pub struct Catalog {
    #[serde(
        default = "catalog_type",
        deserialize_with = "deserialize_catalog_type"
    )]
    r#type: String,

    /// The STAC version the `Catalog` implements.
    #[serde(rename = "stac_version", default)]
    pub version: Version,

    /// A list of extension identifiers the `Catalog` implements.
    #[serde(rename = "stac_extensions")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Identifier for the `Catalog`.
    #[serde(default)]
    pub id: String,

    /// A short descriptive one-line title for the `Catalog`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed multi-line description to fully explain the `Catalog`.
    ///
    /// [CommonMark 0.29](http://commonmark.org/) syntax MAY be used for rich
    /// text representation.
    #[serde(default)]
    pub description: String,

    /// A list of references to other documents.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Additional fields not part of the `Catalog` specification.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,

    #[serde(skip)]
    self_href: Option<String>,
}

impl Catalog {
    /// Creates a new `Catalog` with the given `id` and `description`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Catalog;
    /// let catalog = Catalog::new("an-id", "a description");
    /// assert_eq!(catalog.id, "an-id");
    /// assert_eq!(catalog.description, "a description");
    /// ```
    pub fn new(id: impl ToString, description: impl ToString) -> Catalog {
        Catalog {
            r#type: catalog_type(),
            version: STAC_VERSION,
            extensions: Vec::new(),
            id: id.to_string(),
            title: None,
            description: description.to_string(),
            links: Vec::new(),
            additional_fields: Map::new(),
            self_href: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn new() {
        let catalog = Catalog::new("an-id", "a description");
        assert_eq!(catalog.id, "an-id");
        assert_eq!(catalog.description, "a description");
        assert!(catalog.title.is_none());
        assert!(catalog.links.is_empty());
    }

    #[test]
    fn has_type() {
        let value = serde_json::to_value(Catalog::new("an-id", "a description")).unwrap();
        assert_eq!(value["type"], "Catalog");
    }

    #[test]
    fn permissive_deserialization() {
        let _: Catalog = serde_json::from_value(serde_json::json!({})).unwrap();
    }
}
