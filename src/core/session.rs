use std::sync::Arc;

use log::{debug, info, warn};

use crate::auth::credentials::CredentialManager;
use crate::core::pager::Pager;
use crate::core::provider::{Credentials, Listing, Provider};
use crate::core::record::{ResourceRecordSet, Zone};
use crate::core::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Expired,
}

/// An authenticated handle to one provider account.
///
/// Every request goes through [`Session::execute`], which takes `&mut self`:
/// a session carries at most one request at a time. Once the backend
/// rejects the token the session is `Expired` for good and a new one has
/// to be connected.
pub struct Session {
    provider: Arc<dyn Provider>,
    transport: Arc<dyn Transport>,
    token: Option<String>,
    state: SessionState,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("provider", &self.provider.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub async fn connect(
        provider: Arc<dyn Provider>,
        transport: Arc<dyn Transport>,
        credentials: &dyn CredentialManager,
    ) -> Result<Session> {
        let mut session = Session {
            provider,
            transport,
            token: None,
            state: SessionState::Unauthenticated,
        };
        session.authenticate(credentials).await?;
        Ok(session)
    }

    async fn authenticate(&mut self, manager: &dyn CredentialManager) -> Result<()> {
        let credentials = self
            .provider
            .credential_keys()
            .iter()
            .try_fold(Credentials::new(), |creds, key| {
                Ok::<_, Error>(creds.with(*key, manager.get(key)?))
            })?;
        let request = self.provider.login_request(&credentials)?;

        self.state = SessionState::Authenticating;
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                self.state = SessionState::Unauthenticated;
                return Err(err);
            }
        };
        if !response.is_success() {
            self.state = SessionState::Unauthenticated;
            let message = self.provider.error_message(&response);
            warn!("{} rejected login: {message}", self.provider.name());
            return Err(Error::Authentication(message));
        }
        match self.provider.read_token(&response) {
            Ok(token) => {
                self.token = Some(token);
                self.state = SessionState::Authenticated;
                info!("Connected to {}", self.provider.name());
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Unauthenticated;
                Err(err)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn execute(&mut self, request: ApiRequest) -> Result<ApiResponse> {
        let token = match (self.state, self.token.as_deref()) {
            (SessionState::Authenticated, Some(token)) => token,
            (SessionState::Expired, _) => {
                return Err(Error::SessionExpired(format!(
                    "{} session expired; connect again",
                    self.provider.name()
                )));
            }
            (state, _) => {
                return Err(Error::Authentication(format!(
                    "{} session is {state:?}",
                    self.provider.name()
                )));
            }
        };
        let request = self.provider.authorize(request, token);
        debug!("{} {:?} {}", self.provider.name(), request.method, request.path);

        let response = self.transport.execute(request).await?;
        if self.provider.is_auth_rejection(&response) {
            self.state = SessionState::Expired;
            self.token = None;
            let message = self.provider.error_message(&response);
            warn!("{} session expired: {message}", self.provider.name());
            return Err(Error::SessionExpired(message));
        }
        if !response.is_success() {
            return Err(Error::Provider {
                status: response.status,
                message: self.provider.error_message(&response),
            });
        }
        Ok(response)
    }

    /// Walks `listing` with this session.
    pub fn list<T>(&mut self, listing: Listing<T>) -> Pager<'_, T> {
        Pager::new(self, listing)
    }

    pub fn zones(&mut self) -> Pager<'_, Zone> {
        let listing = self.provider.zones();
        self.list(listing)
    }

    pub fn record_sets(&mut self, zone: &Zone) -> Result<Pager<'_, ResourceRecordSet>> {
        let listing = self.provider.record_sets(zone)?;
        Ok(self.list(listing))
    }

    pub async fn create_record_set(&mut self, zone: &Zone, rrset: &ResourceRecordSet) -> Result<()> {
        let request = self.provider.create_record_set(zone, rrset)?;
        self.execute(request).await?;
        info!(
            "Created {} {} in {} via {}",
            rrset.record_type(),
            rrset.name(),
            zone.name,
            self.provider.name()
        );
        Ok(())
    }
}
