use crate::{Error, Result};
use async_recursion::async_recursion;
use async_trait::async_trait;
use fluent_uri::Uri;
use jsonschema::{AsyncRetrieve, ValidationOptions, Validator as JsonschemaValidator};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use stac::{Type, Version};
use std::collections::HashMap;
use std::sync::Arc;

const SCHEMA_BASE: &str = "https://schemas.stacspec.org";

/// A structure for validating STAC.
pub struct Validator {
    validators: HashMap<Uri<String>, JsonschemaValidator>,
    validation_options: ValidationOptions<Arc<dyn referencing::AsyncRetrieve>>,
}

#[derive(Debug)]
struct Retriever(Client);

impl Validator {
    /// Creates a new validator.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_validate::Validator;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let validator = Validator::new().await.unwrap();
    /// }
    /// ```
    pub async fn new() -> Result<Validator> {
        let validation_options = jsonschema::async_options().with_retriever(Retriever(
            Client::builder().user_agent(crate::user_agent()).build()?,
        ));
        Ok(Validator {
            validators: HashMap::new(),
            validation_options,
        })
    }

    /// Validates a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Item;
    /// use stac_validate::Validate;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let mut item = Item::new("an-id");
    ///     item.validate().await.unwrap();
    /// }
    /// ```
    pub async fn validate<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        let _ = self.validate_value(value).await?;
        Ok(())
    }

    /// If you have a [serde_json::Value], you can skip a deserialization step by using this method.
    #[async_recursion]
    pub async fn validate_value(&mut self, value: Value) -> Result<Value> {
        if let Value::Object(object) = value {
            self.validate_object(object).await.map(Value::Object)
        } else if let Value::Array(array) = value {
            self.validate_array(array).await.map(Value::Array)
        } else {
            Err(Error::ScalarJson(value))
        }
    }

    #[async_recursion]
    async fn validate_array(&mut self, array: Vec<Value>) -> Result<Vec<Value>> {
        let mut errors = Vec::new();
        let mut new_array = Vec::with_capacity(array.len());
        for value in array {
            match self.validate_value(value).await {
                Ok(value) => new_array.push(value),
                Err(error) => {
                    if let Error::Validation(e) = error {
                        errors.extend(e);
                    } else {
                        return Err(error);
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(new_array)
        } else {
            Err(Error::Validation(errors))
        }
    }

    #[async_recursion]
    async fn validate_object(
        &mut self,
        mut object: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let r#type = if let Some(r#type) = object.get("type").and_then(|v| v.as_str()) {
            let r#type: Type = r#type.parse()?;
            r#type
        } else {
            match object.remove("collections") {
                Some(collections) => {
                    let collections = self.validate_value(collections).await?;
                    let _ = object.insert("collections".to_string(), collections);
                    return Ok(object);
                }
                _ => {
                    return Err(stac::Error::MissingField("type").into());
                }
            }
        };

        let version: Version = object
            .get("stac_version")
            .and_then(|v| v.as_str())
            .map(|v| v.parse::<Version>())
            .transpose()
            .unwrap()
            .ok_or(stac::Error::MissingField("stac_version"))?;

        let uri = build_uri(r#type, &version);
        let validator = self.validator(uri).await?;
        let value = Value::Object(object);
        let errors: Vec<_> = validator.iter_errors(&value).collect();
        let object = if errors.is_empty() {
            if let Value::Object(object) = value {
                object
            } else {
                unreachable!()
            }
        } else {
            return Err(Error::from_validation_errors(
                errors.into_iter(),
                Some(&value),
            ));
        };

        self.validate_extensions(object).await
    }

    async fn validate_extensions(
        &mut self,
        object: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        match object
            .get("stac_extensions")
            .and_then(|value| value.as_array())
            .cloned()
        {
            Some(stac_extensions) => {
                let uris = stac_extensions
                    .into_iter()
                    .filter_map(|value| {
                        if let Value::String(s) = value {
                            Some(Uri::parse(s))
                        } else {
                            None
                        }
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                self.ensure_validators(&uris).await?;

                let mut errors = Vec::new();
                let value = Value::Object(object);
                for uri in uris {
                    let validator = self
                        .validator_opt(&uri)
                        .expect("We already ensured they're present");
                    errors.extend(validator.iter_errors(&value));
                }
                if errors.is_empty() {
                    if let Value::Object(object) = value {
                        Ok(object)
                    } else {
                        unreachable!()
                    }
                } else {
                    Err(Error::from_validation_errors(
                        errors.into_iter(),
                        Some(&value),
                    ))
                }
            }
            _ => Ok(object),
        }
    }

    async fn validator(&mut self, uri: Uri<String>) -> Result<&JsonschemaValidator> {
        self.ensure_validator(&uri).await?;
        Ok(self.validator_opt(&uri).unwrap())
    }

    async fn ensure_validators(&mut self, uris: &[Uri<String>]) -> Result<()> {
        for uri in uris {
            self.ensure_validator(uri).await?;
        }
        Ok(())
    }

    async fn ensure_validator(&mut self, uri: &Uri<String>) -> Result<()> {
        if !self.validators.contains_key(uri) {
            let client = reqwest::Client::new();
            let response = client.get(uri.as_str()).send().await?.error_for_status()?;
            let json_data = response.json().await?;
            let validator = self
                .validation_options
                .build(&json_data)
                .await
                .map_err(Box::new)?;
            let _ = self.validators.insert(uri.clone(), validator);
        }
        Ok(())
    }

    fn validator_opt(&self, uri: &Uri<String>) -> Option<&JsonschemaValidator> {
        self.validators.get(uri)
    }
}

#[async_trait]
impl AsyncRetrieve for Retriever {
    async fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.0.get(uri.as_str()).send().await?.error_for_status()?;
        let value = response.json().await?;
        Ok(value)
    }
}

fn build_uri(r#type: Type, version: &Version) -> Uri<String> {
    Uri::parse(format!("{}{}", SCHEMA_BASE, r#type.spec_path(version))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::Validator;
    use crate::Validate;
    use serde_json::json;
    use stac::Item;

    // These hit schemas.stacspec.org over the network (no bundled schema
    // snapshot; see DESIGN.md), so they're ignored by default.

    #[tokio::test]
    #[ignore = "requires network access to schemas.stacspec.org"]
    async fn validate_simple_item() {
        let mut item = Item::new("an-item");
        item.properties.datetime = Some("2024-01-01T00:00:00Z".parse().unwrap());
        item.validate().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires network access to schemas.stacspec.org"]
    async fn validate_array() {
        let items: Vec<_> = (0..10)
            .map(|i| {
                let mut item = Item::new(format!("item-{i}"));
                item.properties.datetime = Some("2024-01-01T00:00:00Z".parse().unwrap());
                item
            })
            .map(|i| serde_json::to_value(i).unwrap())
            .collect();
        let mut validator = Validator::new().await.unwrap();
        validator.validate(&items).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires network access to schemas.stacspec.org"]
    async fn validate_collections() {
        let mut item = Item::new("an-item");
        item.properties.datetime = Some("2024-01-01T00:00:00Z".parse().unwrap());
        let collections = json!({
            "collections": [item]
        });
        collections.validate().await.unwrap();
    }
}
