use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::attributes::AttributeMap;
use crate::core::profile::{ProfileView, Weighted};
use crate::core::record::{ResourceRecordSet, Zone};
use crate::error::{Error, Result};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UltraError {
    #[serde(default)]
    pub error_code: Option<i64>,
    pub error_message: String,
}

#[derive(Deserialize, Debug)]
pub struct ZoneList {
    #[serde(default)]
    pub zones: Vec<UltraZone>,
}

#[derive(Deserialize, Debug)]
pub struct UltraZone {
    pub properties: ZoneProperties,
}

#[derive(Deserialize, Debug)]
pub struct ZoneProperties {
    pub name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RRSetList {
    #[serde(default)]
    pub rr_sets: Vec<UltraRRSet>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UltraRRSet {
    #[serde(default, skip_serializing)]
    pub owner_name: String,
    /// `"A (1)"` on reads, plain type on writes.
    #[serde(default, skip_serializing)]
    pub rrtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub rdata: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UltraProfile>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UltraProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
}

/// Text of an UltraDNS error body: a single object or a list of them.
pub fn error_message(body: &Value) -> Option<String> {
    let errors = match body {
        Value::Array(_) => Vec::<UltraError>::deserialize(body).ok()?,
        _ => vec![UltraError::deserialize(body).ok()?],
    };
    Some(
        errors
            .iter()
            .map(|e| match e.error_code {
                Some(code) => format!("{code}: {}", e.error_message),
                None => e.error_message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// `"A (1)"` -> `"A"`
fn record_type(rrtype: &str) -> &str {
    rrtype.split_whitespace().next().unwrap_or(rrtype)
}

fn rdata_key(record_type: &str) -> &'static str {
    match record_type {
        "A" | "AAAA" => "address",
        "CNAME" => "cname",
        _ => "rdata",
    }
}

pub fn decode_zones(body: &Value) -> Result<Vec<Zone>> {
    let list = ZoneList::deserialize(body)?;
    Ok(list
        .zones
        .into_iter()
        .map(|z| Zone::new(z.properties.name))
        .collect())
}

pub fn decode_record_sets(body: &Value) -> Result<Vec<ResourceRecordSet>> {
    RRSetList::deserialize(body)?
        .rr_sets
        .into_iter()
        .map(to_record_set)
        .collect()
}

pub fn to_record_set(rrset: UltraRRSet) -> Result<ResourceRecordSet> {
    let kind = record_type(&rrset.rrtype).to_string();
    let key = rdata_key(&kind);
    let records = rrset
        .rdata
        .iter()
        .map(|value| AttributeMap::builder().put(key, value.as_str()).build())
        .collect::<Result<Vec<_>>>()?;

    let mut builder = ResourceRecordSet::builder(rrset.owner_name, kind).records(records);
    if let Some(ttl) = rrset.ttl {
        builder = builder.ttl(ttl);
    }
    if let Some(weight) = rrset.profile.and_then(|p| p.weight) {
        let profile = AttributeMap::builder()
            .put("type", Weighted::KIND)
            .put("weight", weight)
            .build()?;
        builder = builder.profile(Weighted::from_attributes(&profile)?);
    }
    builder.build()
}

pub fn to_ultra_rrset(rrset: &ResourceRecordSet) -> Result<UltraRRSet> {
    let key = rdata_key(rrset.record_type());
    let rdata = rrset
        .records()
        .iter()
        .map(|data| {
            data.get_str(key).map(str::to_string).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "{} record data needs a string {key}",
                    rrset.record_type()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(other) = rrset
        .profiles()
        .iter()
        .find(|p| p.discriminant() != Some(Weighted::KIND))
    {
        return Err(Error::Unsupported(format!(
            "ultradns does not take {:?} profiles",
            other.discriminant()
        )));
    }
    let profile = Weighted::try_view_of_rrset(rrset)?.map(|w| UltraProfile {
        weight: Some(Value::from(w.weight())),
    });

    Ok(UltraRRSet {
        owner_name: rrset.name().to_string(),
        rrtype: rrset.record_type().to_string(),
        ttl: rrset.ttl(),
        rdata,
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::address_data;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_decode_rrset_with_weight() {
        let body = json!({
            "zoneName": "denominator.io.",
            "rrSets": [{
                "ownerName": "www.denominator.io.",
                "rrtype": "A (1)",
                "ttl": 300,
                "rdata": ["192.0.2.1", "192.0.2.2"],
                "profile": {"weight": 2}
            }]
        });
        let rrsets = decode_record_sets(&body).unwrap();
        assert_eq!(rrsets[0].record_type(), "A");
        assert_eq!(rrsets[0].records()[0], address_data("192.0.2.1").unwrap());
        let weighted = Weighted::try_view_of_rrset(&rrsets[0]).unwrap().unwrap();
        assert_eq!(weighted.weight(), 2);
    }

    #[test]
    fn test_decode_rrset_with_malformed_weight() {
        let body = json!({"rrSets": [{
            "ownerName": "www.denominator.io.", "rrtype": "A (1)",
            "rdata": ["192.0.2.1"], "profile": {"weight": "heavy"}
        }]});
        assert_matches!(decode_record_sets(&body), Err(Error::TypeMismatch(_)));
    }

    #[test]
    fn test_encode_rrset() {
        let rrset = ResourceRecordSet::builder("www.denominator.io.", "A")
            .ttl(300)
            .record(address_data("192.0.2.1").unwrap())
            .profile(Weighted::create(4).unwrap())
            .build()
            .unwrap();
        let encoded = serde_json::to_value(to_ultra_rrset(&rrset).unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!({"ttl": 300, "rdata": ["192.0.2.1"], "profile": {"weight": 4}})
        );
    }

    #[test]
    fn test_encode_rejects_unknown_profiles() {
        let geo = AttributeMap::builder().put("type", "geo").build().unwrap();
        let rrset = ResourceRecordSet::builder("www.denominator.io.", "A")
            .record(address_data("192.0.2.1").unwrap())
            .profile(geo)
            .build()
            .unwrap();
        assert_matches!(to_ultra_rrset(&rrset), Err(Error::Unsupported(_)));
    }

    #[test]
    fn test_error_message_shapes() {
        let list = json!([{"errorCode": 60001, "errorMessage": "invalid_grant:Invalid username & password combination."}]);
        assert_eq!(
            error_message(&list).unwrap(),
            "60001: invalid_grant:Invalid username & password combination."
        );
        let single = json!({"errorMessage": "Zone does not exist in the system."});
        assert_eq!(
            error_message(&single).unwrap(),
            "Zone does not exist in the system."
        );
        assert_eq!(error_message(&json!({"other": 1})), None);
    }
}
