use crate::{Catalog, Collection, Error, Item, Link, Links, Result, SelfHref, Type};
use serde::{Deserialize, Serialize};

/// An enum that can hold any STAC object type that this crate knows how to
/// catalog: an [Item], [Collection], or [Catalog].
///
/// Unlike the wider STAC ecosystem, this crate never holds a `FeatureCollection`
/// in a `Value` — searching and paging over item collections is the concern
/// of a STAC-API server, not this repository engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An [Item].
    Item(Item),
    /// A [Collection].
    Collection(Collection),
    /// A [Catalog].
    Catalog(Catalog),
}

impl Value {
    /// Returns this value's [Type].
    pub fn r#type(&self) -> Type {
        match self {
            Value::Item(_) => Type::Item,
            Value::Collection(_) => Type::Collection,
            Value::Catalog(_) => Type::Catalog,
        }
    }

    /// Returns this value's `id`.
    pub fn id(&self) -> &str {
        match self {
            Value::Item(item) => &item.id,
            Value::Collection(collection) => &collection.id,
            Value::Catalog(catalog) => &catalog.id,
        }
    }

    /// Returns a reference to this value's links.
    pub fn links(&self) -> &[Link] {
        match self {
            Value::Item(item) => item.links(),
            Value::Collection(collection) => collection.links(),
            Value::Catalog(catalog) => catalog.links(),
        }
    }

    /// Returns a mutable reference to this value's links.
    pub fn links_mut(&mut self) -> &mut Vec<Link> {
        match self {
            Value::Item(item) => item.links_mut(),
            Value::Collection(collection) => collection.links_mut(),
            Value::Catalog(catalog) => catalog.links_mut(),
        }
    }

    /// Returns this value's self href.
    pub fn self_href(&self) -> Option<&str> {
        match self {
            Value::Item(item) => item.self_href(),
            Value::Collection(collection) => collection.self_href(),
            Value::Catalog(catalog) => catalog.self_href(),
        }
    }

    /// Sets this value's self href.
    pub fn set_self_href(&mut self, href: impl ToString) {
        match self {
            Value::Item(item) => item.set_self_href(href),
            Value::Collection(collection) => collection.set_self_href(href),
            Value::Catalog(catalog) => catalog.set_self_href(href),
        }
    }

    /// Returns `true` if this value is a [Catalog] or [Collection], i.e. it
    /// can have `child`/`item` links.
    pub fn can_have_children(&self) -> bool {
        !matches!(self, Value::Item(_))
    }

    /// Returns this value as an [Item], if it is one.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Value::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Returns this value as a [Collection], if it is one.
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Returns this value as a mutable [Collection], if it is one.
    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Returns this value as a [Catalog], if it is one (a [Collection] also
    /// satisfies this, since every field of `Catalog` is also on `Collection`).
    pub fn as_catalog(&self) -> Option<&Catalog> {
        match self {
            Value::Catalog(catalog) => Some(catalog),
            _ => None,
        }
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Value {
        Value::Item(item)
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Value {
        Value::Collection(collection)
    }
}

impl From<Catalog> for Value {
    fn from(catalog: Catalog) -> Value {
        Value::Catalog(catalog)
    }
}

impl TryFrom<Value> for Item {
    type Error = Error;
    fn try_from(value: Value) -> Result<Item> {
        match value {
            Value::Item(item) => Ok(item),
            other => Err(Error::IncorrectType {
                actual: other.r#type().to_string(),
                expected: Type::Item.to_string(),
            }),
        }
    }
}

impl TryFrom<Value> for Collection {
    type Error = Error;
    fn try_from(value: Value) -> Result<Collection> {
        match value {
            Value::Collection(collection) => Ok(collection),
            other => Err(Error::IncorrectType {
                actual: other.r#type().to_string(),
                expected: Type::Collection.to_string(),
            }),
        }
    }
}

impl TryFrom<Value> for Catalog {
    type Error = Error;
    fn try_from(value: Value) -> Result<Catalog> {
        match value {
            Value::Catalog(catalog) => Ok(catalog),
            other => Err(Error::IncorrectType {
                actual: other.r#type().to_string(),
                expected: Type::Catalog.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::{Catalog, Collection, Item, Type};

    #[test]
    fn type_and_id() {
        let value = Value::Item(Item::new("an-id"));
        assert_eq!(value.r#type(), Type::Item);
        assert_eq!(value.id(), "an-id");
    }

    #[test]
    fn roundtrips_through_untagged_serde() {
        let value = Value::Catalog(Catalog::new("an-id", "a description"));
        let json = serde_json::to_value(&value).unwrap();
        let roundtripped: Value = serde_json::from_value(json).unwrap();
        assert_eq!(value, roundtripped);
    }

    #[test]
    fn collection_is_not_item() {
        let value = Value::Collection(Collection::new("an-id", "a description"));
        assert!(value.as_item().is_none());
        assert!(value.as_collection().is_some());
    }
}
