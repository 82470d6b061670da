use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::string_like;
use crate::errors::ServiceError;
use crate::storage::{DocumentStore, ProfileKey};

/// List entry for `GET /api/profiles`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileMeta {
    #[serde(deserialize_with = "string_like")]
    pub id: String,
    #[serde(rename = "updatedAt", deserialize_with = "string_like")]
    pub updated_at: String,
}

/// Profiles stored as `{dir}/{id}.json`.
#[derive(Clone)]
pub struct ProfileStore {
    docs: DocumentStore<ProfileKey>,
}

impl ProfileStore {
    pub async fn new<P: Into<PathBuf>>(dir: P) -> Result<Arc<Self>, ServiceError> {
        let docs = DocumentStore::open(dir).await?;
        Ok(Arc::new(Self { docs }))
    }

    pub fn dir(&self) -> &std::path::Path {
        self.docs.dir()
    }

    pub async fn list(&self) -> Result<Vec<ProfileMeta>, ServiceError> {
        self.docs.list_metadata().await
    }

    pub async fn get(&self, id: &str) -> Result<Value, ServiceError> {
        self.docs.read(&ProfileKey::new(id)?).await
    }

    pub async fn upsert(&self, id: &str, document: &Value) -> Result<(), ServiceError> {
        let key = ProfileKey::new(id)?;
        let path = self.docs.write(&key, document).await?;
        let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
        info!(profile_id = %key.id(), %file, "profile saved");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let key = ProfileKey::new(id)?;
        self.docs.delete(&key).await?;
        info!(profile_id = %key.id(), "profile removed");
        Ok(())
    }
}
