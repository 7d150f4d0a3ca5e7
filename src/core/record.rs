use serde::{Deserialize, Serialize};

use crate::core::attributes::AttributeMap;
use crate::error::{Error, Result};

/// A hosted zone as reported by a provider listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Some(id.into()),
        }
    }
}

/// One name + type, its record data and any attached profiles.
///
/// Immutable once built; "adding" a profile yields a new set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecordSet")]
pub struct ResourceRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    records: Vec<AttributeMap>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    profiles: Vec<AttributeMap>,
}

/// Wire shape of a record set, validated through [`RecordSetBuilder`].
#[derive(Deserialize)]
struct RawRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    records: Vec<AttributeMap>,
    #[serde(default)]
    profiles: Vec<AttributeMap>,
}

impl TryFrom<RawRecordSet> for ResourceRecordSet {
    type Error = Error;

    fn try_from(raw: RawRecordSet) -> Result<Self> {
        let mut builder = ResourceRecordSet::builder(raw.name, raw.record_type).records(raw.records);
        if let Some(ttl) = raw.ttl {
            builder = builder.ttl(ttl);
        }
        raw.profiles
            .into_iter()
            .fold(builder, |builder, profile| builder.profile(profile))
            .build()
    }
}

impl ResourceRecordSet {
    pub fn builder(name: impl Into<String>, record_type: impl Into<String>) -> RecordSetBuilder {
        RecordSetBuilder {
            name: name.into(),
            record_type: record_type.into(),
            ttl: None,
            records: Vec::new(),
            profiles: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn records(&self) -> &[AttributeMap] {
        &self.records
    }

    pub fn profiles(&self) -> &[AttributeMap] {
        &self.profiles
    }

    /// First profile whose `type` equals `kind`.
    pub fn find_profile(&self, kind: &str) -> Option<&AttributeMap> {
        self.profiles.iter().find(|p| p.discriminant() == Some(kind))
    }

    pub fn with_profile(&self, profile: impl Into<AttributeMap>) -> ResourceRecordSet {
        let mut next = self.clone();
        next.profiles.push(profile.into());
        next
    }
}

pub struct RecordSetBuilder {
    name: String,
    record_type: String,
    ttl: Option<u32>,
    records: Vec<AttributeMap>,
    profiles: Vec<AttributeMap>,
}

impl RecordSetBuilder {
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn record(mut self, data: AttributeMap) -> Self {
        self.records.push(data);
        self
    }

    pub fn records(mut self, data: impl IntoIterator<Item = AttributeMap>) -> Self {
        self.records.extend(data);
        self
    }

    pub fn profile(mut self, profile: impl Into<AttributeMap>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    pub fn build(self) -> Result<ResourceRecordSet> {
        if self.name.is_empty() {
            return Err(Error::InvalidArgument("record set name is empty".into()));
        }
        if self.record_type.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "record set {} has no type",
                self.name
            )));
        }
        Ok(ResourceRecordSet {
            name: self.name,
            record_type: self.record_type,
            ttl: self.ttl,
            records: self.records,
            profiles: self.profiles,
        })
    }
}

/// Record data for an `A` or `AAAA` value.
pub fn address_data(address: &str) -> Result<AttributeMap> {
    AttributeMap::builder().put("address", address).build()
}

/// Record data for a `CNAME` value.
pub fn cname_data(target: &str) -> Result<AttributeMap> {
    AttributeMap::builder().put("cname", target).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn profile(kind: &str, label: &str) -> AttributeMap {
        AttributeMap::builder()
            .put("type", kind)
            .put("label", label)
            .build()
            .unwrap()
    }

    fn www() -> ResourceRecordSet {
        ResourceRecordSet::builder("www.denominator.io.", "A")
            .ttl(3600)
            .record(address_data("192.0.2.1").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_find_profile_first_match_wins() {
        let rrset = www()
            .with_profile(profile("geo", "west"))
            .with_profile(profile("weighted", "first"))
            .with_profile(profile("weighted", "second"));
        let found = rrset.find_profile("weighted").unwrap();
        assert_eq!(found.get_str("label"), Some("first"));
        assert!(rrset.find_profile("latency").is_none());
    }

    #[test]
    fn test_with_profile_leaves_original_untouched() {
        let original = www();
        let updated = original.with_profile(profile("weighted", "x"));
        assert!(original.profiles().is_empty());
        assert_eq!(updated.profiles().len(), 1);
        assert_eq!(updated.records(), original.records());
    }

    #[test]
    fn test_build_rejects_empty_name() {
        let result = ResourceRecordSet::builder("", "A").build();
        assert_matches!(result, Err(Error::InvalidArgument(_)));
        let result = ResourceRecordSet::builder("www.denominator.io.", "").build();
        assert_matches!(result, Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn test_profiles_survive_serialization() {
        let weighted = AttributeMap::builder()
            .put("type", "weighted")
            .put("weight", 2)
            .build()
            .unwrap();
        let rrset = www().with_profile(weighted.clone());
        let encoded = serde_json::to_value(&rrset).unwrap();
        assert_eq!(
            encoded,
            json!({
                "name": "www.denominator.io.",
                "type": "A",
                "ttl": 3600,
                "records": [{"address": "192.0.2.1"}],
                "profiles": [{"type": "weighted", "weight": 2}]
            })
        );
        let decoded: ResourceRecordSet = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.find_profile("weighted"), Some(&weighted));
        assert_eq!(decoded, rrset);
    }

    #[test]
    fn test_deserialize_validates_like_builder() {
        let empty = serde_json::from_value::<ResourceRecordSet>(json!({"name": "", "type": ""}));
        assert!(empty.is_err());
        let untyped =
            serde_json::from_value::<ResourceRecordSet>(json!({"name": "www.denominator.io.", "type": ""}));
        assert!(untyped.is_err());

        let minimal: ResourceRecordSet =
            serde_json::from_value(json!({"name": "www.denominator.io.", "type": "A"})).unwrap();
        assert_eq!(minimal.ttl(), None);
        assert!(minimal.records().is_empty());
        assert!(minimal.profiles().is_empty());
    }

    #[test]
    fn test_zone_constructors() {
        assert_eq!(Zone::new("denominator.io").id, None);
        let zone = Zone::with_id("denominator.io", "Z1");
        assert_eq!(zone.id.as_deref(), Some("Z1"));
    }
}
