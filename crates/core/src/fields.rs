use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Implemented by STAC objects that hold a bag of additional, unstructured
/// fields alongside their typed attributes.
///
/// `#[derive(Fields)]` implements this for a struct that has an
/// `additional_fields: serde_json::Map<String, serde_json::Value>` member.
pub trait Fields {
    /// Returns a reference to this object's additional fields.
    fn fields(&self) -> &Map<String, Value>;

    /// Returns a mutable reference to this object's additional fields.
    fn fields_mut(&mut self) -> &mut Map<String, Value>;

    /// Gets a typed value out of the additional fields.
    ///
    /// Returns `Ok(None)` if the field isn't present.
    fn field<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.fields()
            .get(name)
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// Sets a typed value in the additional fields.
    fn set_field<T: Serialize>(&mut self, name: impl ToString, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let _ = self.fields_mut().insert(name.to_string(), value);
        Ok(())
    }

    /// Removes a field, returning its prior value if any.
    fn remove_field<T: DeserializeOwned>(&mut self, name: &str) -> Result<Option<T>> {
        self.fields_mut()
            .remove(name)
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::Fields;
    use crate::Item;

    #[test]
    fn field_round_trips() {
        let mut item = Item::new("an-id");
        item.set_field("a-key", "a-value").unwrap();
        assert_eq!(
            item.field::<String>("a-key").unwrap().as_deref(),
            Some("a-value")
        );
        let removed: Option<String> = item.remove_field("a-key").unwrap();
        assert_eq!(removed.as_deref(), Some("a-value"));
        assert!(item.field::<String>("a-key").unwrap().is_none());
    }
}
