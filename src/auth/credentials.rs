use std::collections::HashMap;
use std::env;

use crate::error::{Error, Result};

pub trait CredentialManager: Send + Sync {
    fn get(&self, key: &str) -> Result<String>;
}

/// Reads `<PREFIX>_<KEY>` from the environment, key upper-cased.
pub struct EnvCredentialManager {
    prefix: String,
}

impl EnvCredentialManager {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_uppercase(),
        }
    }

    fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.to_uppercase())
    }
}

impl CredentialManager for EnvCredentialManager {
    fn get(&self, key: &str) -> Result<String> {
        let name = self.var_name(key);
        env::var(&name).map_err(|e| Error::Credential(format!("{name}: {e}")))
    }
}

/// In-memory credentials, for embedders that load secrets themselves.
#[derive(Default, Clone)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialManager for StaticCredentials {
    fn get(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Credential(format!("missing {key}")))
    }
}
