use serde_json::Value;

use crate::core::provider::{Credentials, Listing, Provider, SinglePage};
use crate::core::record::{ResourceRecordSet, Zone};
use crate::core::transport::{ApiRequest, ApiResponse};
use crate::error::{Error, Result};
use crate::providers::dynect::types::*;

pub const DEFAULT_API_URL: &str = "https://api2.dynect.net/REST";

/// Session-token backend: `POST /Session` hands out a token sent back as
/// `Auth-Token` until the service times it out.
pub struct DynECTProvider;

impl Provider for DynECTProvider {
    fn name(&self) -> &'static str {
        "dynect"
    }

    fn credential_keys(&self) -> &'static [&'static str] {
        &["customer_name", "user_name", "password"]
    }

    fn login_request(&self, credentials: &Credentials) -> Result<ApiRequest> {
        let login = LoginRequest {
            customer_name: credentials.get("customer_name")?,
            user_name: credentials.get("user_name")?,
            password: credentials.get("password")?,
        };
        Ok(ApiRequest::post("/Session").with_body(serde_json::to_value(&login)?))
    }

    fn read_token(&self, response: &ApiResponse) -> Result<String> {
        serde_json::from_value::<DynResponse<SessionData>>(response.body.clone())
            .ok()
            .and_then(|r| r.data)
            .map(|session| session.token)
            .ok_or_else(|| Error::Authentication("session response carries no token".into()))
    }

    fn authorize(&self, request: ApiRequest, token: &str) -> ApiRequest {
        request.with_header("Auth-Token", token)
    }

    fn is_auth_rejection(&self, response: &ApiResponse) -> bool {
        response.status == 401
            || ((!response.is_success() || is_failure(&response.body))
                && messages(&response.body)
                    .iter()
                    .any(|m| m.info.starts_with("login:")))
    }

    fn error_message(&self, response: &ApiResponse) -> String {
        let msgs = messages(&response.body);
        if msgs.is_empty() {
            return match &response.body {
                Value::Null => format!("HTTP {}", response.status),
                body => body.to_string(),
            };
        }
        msgs.iter()
            .map(|m| m.info.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn zones(&self) -> Listing<Zone> {
        Listing::new("/Zone", SinglePage, decode_zones)
    }

    fn record_sets(&self, zone: &Zone) -> Result<Listing<ResourceRecordSet>> {
        Ok(
            Listing::new(format!("/AllRecord/{}", zone.name), SinglePage, decode_record_sets)
                .with_query("detail", "Y"),
        )
    }

    fn create_record_set(&self, zone: &Zone, rrset: &ResourceRecordSet) -> Result<ApiRequest> {
        if !rrset.profiles().is_empty() {
            return Err(Error::Unsupported(
                "dynect record creation does not take profiles".into(),
            ));
        }
        let [rdata] = rrset.records() else {
            return Err(Error::InvalidArgument(format!(
                "dynect creates one record per request, {} has {}",
                rrset.name(),
                rrset.records().len()
            )));
        };
        let body = CreateRecordRequest {
            rdata,
            ttl: rrset.ttl().unwrap_or(0),
        };
        Ok(ApiRequest::post(format!(
            "/{}Record/{}/{}/",
            rrset.record_type(),
            zone.name,
            rrset.name()
        ))
        .with_body(serde_json::to_value(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::Weighted;
    use crate::core::record::address_data;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_login_request_body() {
        let creds = Credentials::new()
            .with("customer_name", "jclouds")
            .with("user_name", "joe")
            .with("password", "letmein");
        let req = DynECTProvider.login_request(&creds).unwrap();
        assert_eq!(req.path, "/Session");
        assert_eq!(
            req.body,
            Some(json!({"customer_name": "jclouds", "user_name": "joe", "password": "letmein"}))
        );
    }

    #[test]
    fn test_auth_rejection_detection() {
        let expired = ApiResponse::new(
            400,
            json!({"status": "failure", "msgs": [{"INFO": "login: IP address does not match current session", "LVL": "ERROR"}]}),
        );
        assert!(DynECTProvider.is_auth_rejection(&expired));
        assert!(DynECTProvider.is_auth_rejection(&ApiResponse::new(401, Value::Null)));

        let other = ApiResponse::new(
            400,
            json!({"status": "failure", "msgs": [{"INFO": "zone: No such zone", "LVL": "ERROR"}]}),
        );
        assert!(!DynECTProvider.is_auth_rejection(&other));

        let failed_with_ok_status = ApiResponse::new(
            200,
            json!({"status": "failure", "msgs": [{"INFO": "login: Bad or expired credentials", "LVL": "ERROR"}]}),
        );
        assert!(DynECTProvider.is_auth_rejection(&failed_with_ok_status));
        let succeeded = ApiResponse::new(
            200,
            json!({"status": "success", "msgs": [{"INFO": "login: Login successful", "LVL": "INFO"}]}),
        );
        assert!(!DynECTProvider.is_auth_rejection(&succeeded));
        assert_eq!(DynECTProvider.error_message(&other), "zone: No such zone");
    }

    #[test]
    fn test_create_request() {
        let rrset = ResourceRecordSet::builder("www.denominator.io", "A")
            .ttl(3600)
            .record(address_data("192.0.2.1").unwrap())
            .build()
            .unwrap();
        let req = DynECTProvider
            .create_record_set(&Zone::new("denominator.io"), &rrset)
            .unwrap();
        assert_eq!(req.path, "/ARecord/denominator.io/www.denominator.io/");
        assert_eq!(
            req.body,
            Some(json!({"rdata": {"address": "192.0.2.1"}, "ttl": 3600}))
        );
    }

    #[test]
    fn test_create_rejects_profiles_and_multiple_records() {
        let zone = Zone::new("denominator.io");
        let two = ResourceRecordSet::builder("www.denominator.io", "A")
            .record(address_data("192.0.2.1").unwrap())
            .record(address_data("192.0.2.2").unwrap())
            .build()
            .unwrap();
        assert_matches!(
            DynECTProvider.create_record_set(&zone, &two),
            Err(Error::InvalidArgument(_))
        );
        let weighted = ResourceRecordSet::builder("www.denominator.io", "A")
            .record(address_data("192.0.2.1").unwrap())
            .profile(Weighted::create(1).unwrap())
            .build()
            .unwrap();
        assert_matches!(
            DynECTProvider.create_record_set(&zone, &weighted),
            Err(Error::Unsupported(_))
        );
    }
}
