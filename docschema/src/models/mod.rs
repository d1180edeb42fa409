//! Typed views of the built-in collections.
//!
//! Each struct mirrors its schema field for field; optional fields are
//! `Option`s. Convert a [`ValidatedDocument`](crate::ValidatedDocument) with
//! [`ValidatedDocument::deserialize`](crate::ValidatedDocument::deserialize)
//! or validate straight into one with
//! [`SchemaRegistry::validate_as`](crate::SchemaRegistry::validate_as).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::schema::{builtin, CollectionNaming, SchemaDefinition};

/// A Rust type backed by a registered schema.
pub trait Model: Serialize + DeserializeOwned {
    /// Name of the declaring type; the collection name is derived from it.
    const TYPE_NAME: &'static str;

    fn schema() -> SchemaDefinition;

    fn collection_name() -> String {
        CollectionNaming::standard().resolve(Self::TYPE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: String,
    pub age: Option<i64>,
    pub is_active: bool,
}

impl Model for User {
    const TYPE_NAME: &'static str = "User";

    fn schema() -> SchemaDefinition {
        builtin::user()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl Model for Product {
    const TYPE_NAME: &'static str = "Product";

    fn schema() -> SchemaDefinition {
        builtin::product()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub name: String,
    pub color: Option<String>,
    pub sweetness: Option<i64>,
    pub origin: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl Model for Fruit {
    const TYPE_NAME: &'static str = "Fruit";

    fn schema() -> SchemaDefinition {
        builtin::fruit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(User::collection_name(), "user");
        assert_eq!(Product::collection_name(), "product");
        assert_eq!(Fruit::collection_name(), "fruit");
    }

    #[test]
    fn test_schema_matches_struct_fields() {
        fn field_names(schema: SchemaDefinition) -> Vec<String> {
            schema.fields.into_iter().map(|f| f.name).collect()
        }

        let user = User {
            name: "A".into(),
            email: "a@b.com".into(),
            address: "x".into(),
            age: None,
            is_active: true,
        };
        let value = serde_json::to_value(&user).unwrap();
        let keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, field_names(User::schema()));
    }

    #[test]
    fn test_schema_collection_matches_model() {
        assert_eq!(Fruit::schema().collection_name, Fruit::collection_name());
        assert_eq!(Product::schema().type_name, Product::TYPE_NAME);
    }
}
