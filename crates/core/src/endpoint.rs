use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// One external API path and the collection it overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub collection_name: String,
    pub path: String,
}

impl EndpointDescriptor {
    pub fn new(collection_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            path: path.into(),
        }
    }
}

/// Ordered collection → path table. Collection names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointTable {
    entries: Vec<EndpointDescriptor>,
}

impl EndpointTable {
    pub fn new(entries: Vec<EndpointDescriptor>) -> Result<Self, RosterError> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.collection_name.is_empty() {
                return Err(RosterError::Config(format!(
                    "endpoint {} has an empty collection name",
                    entry.path
                )));
            }
            if entries[..i]
                .iter()
                .any(|e| e.collection_name == entry.collection_name)
            {
                return Err(RosterError::Config(format!(
                    "duplicate collection '{}' in endpoint table",
                    entry.collection_name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Build from `(collection, path)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, RosterError> {
        Self::new(
            pairs
                .iter()
                .map(|(name, path)| EndpointDescriptor::new(*name, *path))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EndpointTable {
    type Item = &'a EndpointDescriptor;
    type IntoIter = std::slice::Iter<'a, EndpointDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
