//! Provider-agnostic DNS management.
//!
//! A [`Session`] authenticates against one DNS provider and lists zones
//! and resource record sets through a lazily paged [`Pager`]. Record data
//! and routing profiles are carried as ordered [`AttributeMap`]s, with
//! typed views such as [`Weighted`] layered on top.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod providers;

pub use crate::auth::credentials::{CredentialManager, EnvCredentialManager, StaticCredentials};
pub use crate::config::ProviderConfig;
pub use crate::core::attributes::{AttributeMap, AttributeMapBuilder, DuplicateKeys};
pub use crate::core::pager::Pager;
pub use crate::core::profile::{Geo, ProfileView, Weighted};
pub use crate::core::provider::{Cursor, Listing, Pagination, Provider};
pub use crate::core::record::{RecordSetBuilder, ResourceRecordSet, Zone};
pub use crate::core::registry::ProviderRegistry;
pub use crate::core::session::{Session, SessionState};
pub use crate::core::transport::{ApiRequest, ApiResponse, Method, Transport};
pub use crate::error::{Error, Result};
pub use crate::providers::http::HttpTransport;
