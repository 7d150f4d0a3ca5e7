use serde_json::Value;

use crate::core::record::{ResourceRecordSet, Zone};
use crate::core::transport::{ApiRequest, ApiResponse};
use crate::error::{Error, Result};

/// Credential values read for one connect attempt, keyed by the names a
/// provider declares in [`Provider::credential_keys`].
#[derive(Clone, Default)]
pub struct Credentials {
    values: Vec<(String, String)>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| Error::Credential(format!("missing credential {key}")))
    }
}

// Never print secrets.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|(k, _)| k))
            .finish()
    }
}

/// Position marker for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Offset(usize),
    Token(String),
}

/// How one provider walks a listing: what to ask for, and where to go next.
pub trait Pagination: Send + Sync {
    fn request(&self, path: &str, cursor: Option<&Cursor>) -> ApiRequest;

    /// `None` ends the listing after the current page.
    fn next_cursor(
        &self,
        response: &ApiResponse,
        cursor: Option<&Cursor>,
        returned: usize,
    ) -> Option<Cursor>;
}

/// The whole listing arrives in one response.
pub struct SinglePage;

impl Pagination for SinglePage {
    fn request(&self, path: &str, _cursor: Option<&Cursor>) -> ApiRequest {
        ApiRequest::get(path)
    }

    fn next_cursor(&self, _: &ApiResponse, _: Option<&Cursor>, _: usize) -> Option<Cursor> {
        None
    }
}

/// `offset`/`limit` query parameters; stops at the first empty page.
pub struct OffsetPages {
    pub limit: usize,
    pub offset_param: &'static str,
    pub limit_param: &'static str,
}

impl OffsetPages {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            offset_param: "offset",
            limit_param: "limit",
        }
    }
}

impl Pagination for OffsetPages {
    fn request(&self, path: &str, cursor: Option<&Cursor>) -> ApiRequest {
        let offset = match cursor {
            Some(Cursor::Offset(offset)) => *offset,
            _ => 0,
        };
        ApiRequest::get(path)
            .with_query(self.offset_param, offset)
            .with_query(self.limit_param, self.limit)
    }

    fn next_cursor(
        &self,
        _response: &ApiResponse,
        cursor: Option<&Cursor>,
        returned: usize,
    ) -> Option<Cursor> {
        let offset = match cursor {
            Some(Cursor::Offset(offset)) => *offset,
            _ => 0,
        };
        Some(Cursor::Offset(offset + returned))
    }
}

/// Continuation token echoed back as a query parameter.
pub struct TokenPages {
    pub param: &'static str,
    pub token_field: &'static str,
}

impl Pagination for TokenPages {
    fn request(&self, path: &str, cursor: Option<&Cursor>) -> ApiRequest {
        match cursor {
            Some(Cursor::Token(token)) => ApiRequest::get(path).with_query(self.param, token),
            _ => ApiRequest::get(path),
        }
    }

    fn next_cursor(&self, response: &ApiResponse, _: Option<&Cursor>, _: usize) -> Option<Cursor> {
        response
            .body
            .get(self.token_field)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(|token| Cursor::Token(token.to_string()))
    }
}

pub type Decoder<T> = fn(&Value) -> Result<Vec<T>>;

/// Everything a [`Pager`](crate::core::pager::Pager) needs to enumerate one resource.
pub struct Listing<T> {
    pub path: String,
    /// Sent with every page on top of the pagination parameters.
    pub query: Vec<(String, String)>,
    pub pagination: Box<dyn Pagination>,
    pub decode: Decoder<T>,
}

impl<T> Listing<T> {
    pub fn new(
        path: impl Into<String>,
        pagination: impl Pagination + 'static,
        decode: Decoder<T>,
    ) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            pagination: Box::new(pagination),
            decode,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub(crate) fn page_request(&self, cursor: Option<&Cursor>) -> ApiRequest {
        let mut request = self.pagination.request(&self.path, cursor);
        request.query.extend(self.query.iter().cloned());
        request
    }
}

/// A backend's dialect: login exchange, request signing, listing shapes.
///
/// Chosen when a session is connected and consulted by the session for
/// every request it issues.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn credential_keys(&self) -> &'static [&'static str];

    fn login_request(&self, credentials: &Credentials) -> Result<ApiRequest>;

    /// Extracts the session token from a successful login response.
    fn read_token(&self, response: &ApiResponse) -> Result<String>;

    fn authorize(&self, request: ApiRequest, token: &str) -> ApiRequest;

    fn is_auth_rejection(&self, response: &ApiResponse) -> bool {
        response.status == 401
    }

    fn error_message(&self, response: &ApiResponse) -> String {
        response
            .body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| response.body.to_string())
    }

    fn zones(&self) -> Listing<Zone>;

    fn record_sets(&self, zone: &Zone) -> Result<Listing<ResourceRecordSet>> {
        Err(Error::Unsupported(format!(
            "{} cannot list record sets of {}",
            self.name(),
            zone.name
        )))
    }

    fn create_record_set(&self, zone: &Zone, rrset: &ResourceRecordSet) -> Result<ApiRequest> {
        Err(Error::Unsupported(format!(
            "{} cannot create {} in {}",
            self.name(),
            rrset.name(),
            zone.name
        )))
    }
}
