use std::{collections::HashMap, path::Path};

use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use super::domain::Role;
use crate::errors::ServiceError;

/// Immutable `token -> role` map read once at process start.
///
/// Restart the process to pick up token changes.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: HashMap<String, Role>,
}

impl TokenStore {
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tokens = entries
            .into_iter()
            .map(|(k, v)| (k.into(), Role::new(v)))
            .collect();
        Self { tokens }
    }

    /// Load the token file. A missing file yields an empty store and a warning;
    /// a file that is not a JSON object is a configuration error.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "tokens file not found; no tokens configured. Create it with {{\"<token>\": \"editor\"}} to enable auth"
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(ServiceError::Io(e)),
        };
        let store = Self::parse(&bytes)
            .map_err(|msg| ServiceError::Config(format!("{}: {msg}", path.display())))?;
        info!(path = %path.display(), count = store.len(), "tokens loaded");
        Ok(store)
    }

    fn parse(bytes: &[u8]) -> Result<Self, String> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let Value::Object(map) = value else {
            return Err("must be a JSON object mapping token strings to roles".into());
        };
        Ok(Self::from_map(map.into_iter().map(|(k, v)| (k, coerce_string(v)))))
    }

    pub fn role_for(&self, token: &str) -> Option<&Role> {
        self.tokens.get(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn coerce_string(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
