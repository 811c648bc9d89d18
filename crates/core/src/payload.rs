//! Decoded API bodies and their normalization into flat record lists.

use serde_json::{Map, Value};

use crate::error::PayloadError;

/// One document as returned by an external API. Its fields are never interpreted.
pub type Record = Map<String, Value>;

/// A decoded API body.
///
/// Providers answer either with a JSON array of objects or with an object
/// keyed by external id. Both collapse into an ordered `Vec<Record>` through
/// [`Payload::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Sequence(Vec<Record>),
    Mapping(Vec<(String, Record)>),
}

impl Payload {
    /// Classify a decoded JSON value.
    ///
    /// Arrays must contain only objects, mappings must map to objects.
    /// Anything else is rejected so it never reaches the store.
    pub fn from_json(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Array(items) => {
                let mut records = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(obj) => records.push(obj),
                        other => {
                            return Err(PayloadError::NonObjectElement {
                                index,
                                found: kind_of(&other),
                            })
                        }
                    }
                }
                Ok(Payload::Sequence(records))
            }
            Value::Object(obj) => {
                let mut entries = Vec::with_capacity(obj.len());
                for (key, item) in obj {
                    match item {
                        Value::Object(record) => entries.push((key, record)),
                        other => {
                            return Err(PayloadError::NonObjectValue {
                                key,
                                found: kind_of(&other),
                            })
                        }
                    }
                }
                Ok(Payload::Mapping(entries))
            }
            other => Err(PayloadError::UnexpectedShape(kind_of(&other))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Sequence(records) => records.len(),
            Payload::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label for logs ("sequence" / "mapping").
    pub fn shape(&self) -> &'static str {
        match self {
            Payload::Sequence(_) => "sequence",
            Payload::Mapping(_) => "mapping",
        }
    }

    /// Flatten into an ordered list of records.
    ///
    /// Mapping keys are dropped; the records keep whatever id fields the
    /// provider put in them.
    pub fn normalize(self) -> Vec<Record> {
        match self {
            Payload::Sequence(records) => records,
            Payload::Mapping(entries) => entries.into_iter().map(|(_, record)| record).collect(),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_objects_is_a_sequence() {
        let payload = Payload::from_json(json!([
            {"Key": "ARI", "City": "Arizona"},
            {"Key": "ATL", "City": "Atlanta"}
        ]))
        .unwrap();

        assert_eq!(payload.shape(), "sequence");
        let records = payload.normalize();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Key"], json!("ARI"));
        assert_eq!(records[1]["Key"], json!("ATL"));
    }

    #[test]
    fn mapping_normalizes_to_its_values() {
        let payload = Payload::from_json(json!({
            "102": {"player_id": "102", "full_name": "B"},
            "101": {"player_id": "101", "full_name": "A"}
        }))
        .unwrap();

        assert_eq!(payload.shape(), "mapping");
        assert_eq!(payload.len(), 2);
        let mut ids: Vec<_> = payload
            .normalize()
            .into_iter()
            .map(|r| r["player_id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["101", "102"]);
    }

    #[test]
    fn mapping_keys_are_not_injected() {
        let records = Payload::from_json(json!({"7": {"name": "x"}}))
            .unwrap()
            .normalize();
        assert_eq!(records[0].len(), 1);
        assert!(!records[0].contains_key("7"));
    }

    #[test]
    fn empty_shapes_are_empty() {
        assert!(Payload::from_json(json!([])).unwrap().is_empty());
        assert!(Payload::from_json(json!({})).unwrap().is_empty());
    }

    #[test]
    fn scalars_are_rejected() {
        assert_eq!(
            Payload::from_json(json!("oops")).unwrap_err(),
            PayloadError::UnexpectedShape("a string")
        );
        assert_eq!(
            Payload::from_json(Value::Null).unwrap_err(),
            PayloadError::UnexpectedShape("null")
        );
    }

    #[test]
    fn non_object_elements_are_rejected() {
        let err = Payload::from_json(json!([{"a": 1}, 2])).unwrap_err();
        assert_eq!(
            err,
            PayloadError::NonObjectElement { index: 1, found: "a number" }
        );

        let err = Payload::from_json(json!({"1": {"a": 1}, "2": [1]})).unwrap_err();
        assert!(matches!(err, PayloadError::NonObjectValue { ref key, .. } if key == "2"));
    }
}
