use crate::core::provider::{Credentials, Listing, OffsetPages, Provider};
use crate::core::record::{ResourceRecordSet, Zone};
use crate::core::transport::{ApiRequest, ApiResponse};
use crate::error::{Error, Result};
use crate::providers::ultradns::types::*;

pub const DEFAULT_API_URL: &str = "https://api.ultradns.com";
pub const PAGE_SIZE: usize = 100;

/// Password-grant backend: an access token sent as a bearer credential,
/// with offset/limit listings.
pub struct UltraDNSProvider {
    page_size: usize,
}

impl Default for UltraDNSProvider {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl UltraDNSProvider {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }
}

impl Provider for UltraDNSProvider {
    fn name(&self) -> &'static str {
        "ultradns"
    }

    fn credential_keys(&self) -> &'static [&'static str] {
        &["username", "password"]
    }

    fn login_request(&self, credentials: &Credentials) -> Result<ApiRequest> {
        let login = LoginRequest {
            grant_type: "password",
            username: credentials.get("username")?,
            password: credentials.get("password")?,
        };
        Ok(ApiRequest::post("/authorization/token").with_body(serde_json::to_value(&login)?))
    }

    fn read_token(&self, response: &ApiResponse) -> Result<String> {
        serde_json::from_value::<TokenResponse>(response.body.clone())
            .map(|t| t.access_token)
            .map_err(|e| Error::Authentication(format!("token response: {e}")))
    }

    fn authorize(&self, request: ApiRequest, token: &str) -> ApiRequest {
        request.with_header("Authorization", format!("Bearer {token}"))
    }

    fn error_message(&self, response: &ApiResponse) -> String {
        error_message(&response.body).unwrap_or_else(|| format!("HTTP {}", response.status))
    }

    fn zones(&self) -> Listing<Zone> {
        Listing::new("/zones", OffsetPages::new(self.page_size), decode_zones)
    }

    fn record_sets(&self, zone: &Zone) -> Result<Listing<ResourceRecordSet>> {
        Ok(Listing::new(
            format!("/zones/{}/rrsets", zone.name),
            OffsetPages::new(self.page_size),
            decode_record_sets,
        ))
    }

    fn create_record_set(&self, zone: &Zone, rrset: &ResourceRecordSet) -> Result<ApiRequest> {
        let body = to_ultra_rrset(rrset)?;
        Ok(ApiRequest::post(format!(
            "/zones/{}/rrsets/{}/{}",
            zone.name,
            rrset.record_type(),
            rrset.name()
        ))
        .with_body(serde_json::to_value(&body)?))
    }
}
