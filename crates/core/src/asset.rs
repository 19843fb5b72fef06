use indexmap::IndexMap;
use serde_json::{Map, Value};

/// An `Asset` is an object that contains a link to data associated with the
/// [Item](crate::Item) or [Collection](crate::Collection) that can be
/// downloaded or streamed.
///
/// It is allowed to add additional fields.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Asset {
    /// URI to the asset object.
    ///
    /// Relative and absolute URI are both allowed.
    pub href: String,

    /// The displayed title for clients and users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A description of the Asset providing additional details, such as
    /// how it was processed or created.
    ///
    /// [CommonMark 0.29](http://commonmark.org/) syntax MAY be used for rich
    /// text representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// [Media type](crate::mime) of the asset.
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The semantic roles of the asset, e.g. `"thumbnail"`, `"overview"`,
    /// `"data"`, `"metadata"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// Additional fields on the asset.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Asset {
    /// Creates a new asset with the given href.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Asset;
    /// let asset = Asset::new("an-href");
    /// assert_eq!(asset.href, "an-href");
    /// ```
    pub fn new(href: impl ToString) -> Asset {
        Asset {
            href: href.to_string(),
            title: None,
            description: None,
            r#type: None,
            roles: None,
            additional_fields: Map::new(),
        }
    }

    /// Returns `true` if this asset has the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .as_ref()
            .map(|roles| roles.iter().any(|r| r == role))
            .unwrap_or(false)
    }
}

/// Implemented by any STAC object that has an `assets` map.
///
/// `#[derive(Assets)]` is not generated by the derive crate (unlike
/// `SelfHref`/`Links`/`Fields`); this trait is implemented by hand for
/// [Item](crate::Item) and [Collection](crate::Collection) since their
/// assets live at different nesting depths relative to other shared fields.
pub trait Assets {
    /// Returns a reference to this object's assets.
    fn assets(&self) -> &IndexMap<String, Asset>;

    /// Returns a mutable reference to this object's assets.
    fn assets_mut(&mut self) -> &mut IndexMap<String, Asset>;

    /// Returns an iterator over this object's assets that have the given role.
    fn assets_with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = (&'a str, &'a Asset)> {
        self.assets()
            .iter()
            .filter(move |(_, asset)| asset.has_role(role))
            .map(|(key, asset)| (key.as_str(), asset))
    }
}

#[cfg(test)]
mod tests {
    use super::Asset;

    #[test]
    fn new() {
        let asset = Asset::new("an-href");
        assert_eq!(asset.href, "an-href");
        assert!(asset.title.is_none());
        assert!(asset.description.is_none());
        assert!(asset.r#type.is_none());
        assert!(asset.roles.is_none());
    }

    #[test]
    fn has_role() {
        let mut asset = Asset::new("an-href");
        asset.roles = Some(vec!["data".to_string()]);
        assert!(asset.has_role("data"));
        assert!(!asset.has_role("thumbnail"));
    }
}
