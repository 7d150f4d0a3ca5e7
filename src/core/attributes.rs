//! Ordered, immutable attribute maps used for provider-specific metadata.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Key holding the discriminant of a profile-shaped map.
pub const TYPE_KEY: &str = "type";

/// How a builder treats a key that is put twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// The later value replaces the earlier one, keeping the original position.
    #[default]
    LastWins,
    /// `build()` fails with `InvalidArgument`.
    Reject,
}

/// String keys mapped to codec values, in insertion order.
///
/// Equality ignores order; iteration and serialization keep it.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: Vec<(String, Value)>,
}

impl AttributeMap {
    pub fn builder() -> AttributeMapBuilder {
        AttributeMapBuilder::new(DuplicateKeys::LastWins)
    }

    pub fn strict_builder() -> AttributeMapBuilder {
        AttributeMapBuilder::new(DuplicateKeys::Reject)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value of the `type` key when it is a string.
    pub fn discriminant(&self) -> Option<&str> {
        self.get_str(TYPE_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_ordered_pairs(&self) -> Vec<(String, Value)> {
        self.entries.clone()
    }

    /// Returns a new map with `key` set; the receiver is left untouched.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<AttributeMap> {
        self.entries
            .iter()
            .fold(AttributeMap::builder(), |b, (k, v)| b.put(k.clone(), v.clone()))
            .put(key, value)
            .build()
    }
}

impl PartialEq for AttributeMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for AttributeMap {}

pub struct AttributeMapBuilder {
    entries: Vec<(String, Value)>,
    policy: DuplicateKeys,
    error: Option<Error>,
}

impl AttributeMapBuilder {
    pub fn new(policy: DuplicateKeys) -> Self {
        Self {
            entries: Vec::new(),
            policy,
            error: None,
        }
    }

    /// Adds an entry. Problems are reported by `build()`.
    pub fn put(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            self.error = Some(Error::InvalidArgument(format!("null value for key {key}")));
            return self;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(_) if self.policy == DuplicateKeys::Reject => {
                self.error = Some(Error::InvalidArgument(format!("duplicate key {key}")));
            }
            Some(existing) => existing.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn build(self) -> Result<AttributeMap> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(AttributeMap {
                entries: self.entries,
            }),
        }
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AttributeMapVisitor;

        impl<'de> Visitor<'de> for AttributeMapVisitor {
            type Value = AttributeMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attributes")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<AttributeMap, A::Error> {
                let mut builder = AttributeMap::builder();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    // absent and null are the same thing to the model
                    if !value.is_null() {
                        builder = builder.put(key, value);
                    }
                }
                builder.build().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(AttributeMapVisitor)
    }
}
