//! Collection: a named node of the library's folder tree.

use serde::{Deserialize, Serialize};
use super::Extra;

/// One record of `GET /collections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    pub data: CollectionData,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionData {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// The API sends `false` for top-level collections and a key otherwise.
    #[serde(rename = "parentCollection", default, with = "parent_key")]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Collection {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            data: CollectionData {
                key: key.clone(),
                name: name.into(),
                parent: None,
                extra: Extra::new(),
            },
            key,
            extra: Extra::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.data.parent = Some(parent.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.data.parent.as_deref()
    }
}

/// `parentCollection`: `false | null | "KEY"` on the wire, `Option<String>` here.
mod parent_key {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Key(String),
        Flag(#[allow(dead_code)] bool),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Key(key)) if !key.is_empty() => Some(key),
            Some(Raw::Key(_)) | Some(Raw::Flag(_)) | None => None,
        })
    }

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(key) => serializer.serialize_str(key),
            None => serializer.serialize_bool(false),
        }
    }
}
