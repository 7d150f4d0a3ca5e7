pub mod attributes;
pub mod pager;
pub mod profile;
pub mod provider;
pub mod record;
pub mod registry;
pub mod session;
pub mod transport;
