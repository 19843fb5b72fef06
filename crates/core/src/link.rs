use serde_json::{Map, Value};

/// The `self` relation type.
pub const SELF: &str = "self";
/// The `root` relation type.
pub const ROOT: &str = "root";
/// The `parent` relation type.
pub const PARENT: &str = "parent";
/// The `child` relation type.
pub const CHILD: &str = "child";
/// The `item` relation type.
pub const ITEM: &str = "item";

/// This object describes a relationship with another entity.
///
/// Data providers are advised to be liberal with the links section to
/// describe things like the [Catalog](crate::Catalog) an [Item](crate::Item)
/// belongs to, related `Item`s, previous and next `Item`s in a series, and
/// more.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    /// The actual link in the format of an URL.
    ///
    /// Relative and absolute links are both allowed.
    pub href: String,

    /// Relationship between the current document and the linked document.
    pub rel: String,

    /// [Media type](crate::mime) of the referenced entity.
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// A human readable title to be used in rendered displays of the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields on the link.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Implemented by any STAC object that has a `links` vector.
///
/// `#[derive(Links)]` implements this for a struct that has a
/// `links: Vec<Link>` member.
pub trait Links {
    /// Returns a reference to this object's links.
    fn links(&self) -> &[Link];

    /// Returns a mutable reference to this object's links.
    fn links_mut(&mut self) -> &mut Vec<Link>;

    /// Returns the first link with the given `rel` type.
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|link| link.rel == rel)
    }

    /// Returns all links with the given `rel` type.
    fn links_with_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> {
        self.links().iter().filter(move |link| link.rel == rel)
    }

    /// Returns this object's `self` link, if any.
    fn self_link(&self) -> Option<&Link> {
        self.link(SELF)
    }

    /// Returns this object's `root` link, if any.
    fn root_link(&self) -> Option<&Link> {
        self.link(ROOT)
    }

    /// Returns this object's `parent` link, if any.
    fn parent_link(&self) -> Option<&Link> {
        self.link(PARENT)
    }

    /// Returns this object's `child` links.
    fn child_links(&self) -> impl Iterator<Item = &Link> {
        self.links_with_rel(CHILD)
    }

    /// Returns this object's `item` links.
    fn item_links(&self) -> impl Iterator<Item = &Link> {
        self.links_with_rel(ITEM)
    }

    /// Removes every link with the given `rel` type, returning how many were removed.
    fn remove_rel(&mut self, rel: &str) -> usize {
        let before = self.links_mut().len();
        self.links_mut().retain(|link| link.rel != rel);
        before - self.links_mut().len()
    }

    /// Removes this object's `parent` and `root` links.
    ///
    /// Used before re-cataloging an object under a new parent, mirroring
    /// how `set_parent(None)` behaves on the object it's re-homing.
    fn clear_structural_links(&mut self) {
        let _ = self.remove_rel(PARENT);
        let _ = self.remove_rel(ROOT);
    }
}

impl Link {
    /// Creates a new link with the given href and rel type.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Link;
    /// let link = Link::new("an-href", "a-rel-type");
    /// assert_eq!(link.href, "an-href");
    /// assert_eq!(link.rel, "a-rel-type");
    /// ```
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            title: None,
            additional_fields: Map::new(),
        }
    }

    /// Creates a new `self` link.
    pub fn self_(href: impl ToString) -> Link {
        Link::new(href, SELF)
    }

    /// Creates a new `root` link.
    pub fn root(href: impl ToString) -> Link {
        Link::new(href, ROOT)
    }

    /// Creates a new `parent` link.
    pub fn parent(href: impl ToString) -> Link {
        Link::new(href, PARENT)
    }

    /// Creates a new `child` link.
    pub fn child(href: impl ToString) -> Link {
        Link::new(href, CHILD)
    }

    /// Creates a new `item` link.
    pub fn item(href: impl ToString) -> Link {
        Link::new(href, ITEM)
    }

    /// Returns `true` if this link's `rel` is `self`.
    pub fn is_self(&self) -> bool {
        self.rel == SELF
    }

    /// Returns `true` if this link's `rel` is `root`.
    pub fn is_root(&self) -> bool {
        self.rel == ROOT
    }

    /// Returns `true` if this link's `rel` is `parent`.
    pub fn is_parent(&self) -> bool {
        self.rel == PARENT
    }

    /// Returns `true` if this link's `rel` is `child`.
    pub fn is_child(&self) -> bool {
        self.rel == CHILD
    }

    /// Returns `true` if this link's `rel` is `item`.
    pub fn is_item(&self) -> bool {
        self.rel == ITEM
    }

    /// Returns `true` if this link's `rel` is `child` or `item`, i.e. it
    /// points at something catalogable underneath this object.
    pub fn is_structural_child(&self) -> bool {
        self.is_child() || self.is_item()
    }
}

#[cfg(test)]
mod tests {
    use super::{Link, Links};

    struct Holder(Vec<Link>);

    impl Links for Holder {
        fn links(&self) -> &[Link] {
            &self.0
        }
        fn links_mut(&mut self) -> &mut Vec<Link> {
            &mut self.0
        }
    }

    #[test]
    fn find_by_rel() {
        let holder = Holder(vec![Link::root("a"), Link::child("b"), Link::child("c")]);
        assert_eq!(holder.root_link().unwrap().href, "a");
        assert_eq!(holder.child_links().count(), 2);
    }

    #[test]
    fn remove_rel() {
        let mut holder = Holder(vec![Link::parent("a"), Link::root("b")]);
        holder.clear_structural_links();
        assert!(holder.links().is_empty());
    }
}
