// Validated documents - the output of a successful validation

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Result;

/// A document where every declared field is present, correctly typed and
/// within bounds. Fields are kept in schema declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    collection: String,
    fields: Map<String, Value>,
}

impl ValidatedDocument {
    pub(crate) fn new(collection: String, fields: Map<String, Value>) -> Self {
        Self { collection, fields }
    }

    /// Collection this document was validated against.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Deserialize into a typed model.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

impl Serialize for ValidatedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
