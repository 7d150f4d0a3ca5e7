use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::attributes::AttributeMap;
use crate::core::record::{ResourceRecordSet, Zone};
use crate::error::{Error, Result};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub customer_name: &'a str,
    pub user_name: &'a str,
    pub password: &'a str,
}

/// Envelope around every DynECT response body.
#[derive(Deserialize, Debug)]
pub struct DynResponse<T> {
    #[serde(default)]
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub msgs: Vec<DynMessage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DynMessage {
    #[serde(rename = "INFO", default)]
    pub info: String,
}

#[derive(Deserialize, Debug)]
pub struct SessionData {
    pub token: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DynRecord {
    pub fqdn: String,
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    pub rdata: AttributeMap,
}

#[derive(Serialize, Debug)]
pub struct CreateRecordRequest<'a> {
    pub rdata: &'a AttributeMap,
    pub ttl: u32,
}

/// Messages attached to a response; empty when the body is not an envelope.
pub fn messages(body: &Value) -> Vec<DynMessage> {
    body.get("msgs")
        .and_then(|msgs| Vec::<DynMessage>::deserialize(msgs).ok())
        .unwrap_or_default()
}

/// True when the envelope reports `"status": "failure"`.
pub fn is_failure(body: &Value) -> bool {
    DynResponse::<Value>::deserialize(body).is_ok_and(|r| r.status == "failure")
}

/// `/REST/Zone/denominator.io/` -> `denominator.io`
pub fn zone_from_uri(uri: &str) -> Result<Zone> {
    uri.split_once("/Zone/")
        .map(|(_, rest)| rest.trim_matches('/'))
        .filter(|name| !name.is_empty())
        .map(Zone::new)
        .ok_or_else(|| Error::Decode(format!("not a zone uri: {uri}")))
}

pub fn decode_zones(body: &Value) -> Result<Vec<Zone>> {
    let response = DynResponse::<Vec<String>>::deserialize(body)?;
    response
        .data
        .unwrap_or_default()
        .iter()
        .map(|uri| zone_from_uri(uri))
        .collect()
}

/// Groups `AllRecord?detail=Y` records by name and type, in first-seen order.
pub fn decode_record_sets(body: &Value) -> Result<Vec<ResourceRecordSet>> {
    let response = DynResponse::<Map<String, Value>>::deserialize(body)?;
    let mut groups: Vec<(String, String, Option<u32>, Vec<AttributeMap>)> = Vec::new();
    for records in response.data.unwrap_or_default().values() {
        for record in Vec::<DynRecord>::deserialize(records)? {
            match groups
                .iter_mut()
                .find(|(fqdn, kind, _, _)| *fqdn == record.fqdn && *kind == record.record_type)
            {
                Some(group) => group.3.push(record.rdata),
                None => groups.push((
                    record.fqdn,
                    record.record_type,
                    record.ttl,
                    vec![record.rdata],
                )),
            }
        }
    }
    groups
        .into_iter()
        .map(|(fqdn, kind, ttl, rdata)| {
            let builder = ResourceRecordSet::builder(fqdn, kind).records(rdata);
            match ttl {
                Some(ttl) => builder.ttl(ttl).build(),
                None => builder.build(),
            }
        })
        .collect()
}
