//! UltraDNS provider implementation

pub mod client;
pub mod types;


pub use client::{DEFAULT_API_URL, UltraDNSProvider};
