use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{opt_string_like, string_like};
use crate::errors::ServiceError;
use crate::storage::{DocumentStore, ScenarioKey};

/// List entry for `GET /api/scenarios`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ScenarioMeta {
    pub id: String,
    pub version: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub name: String,
}

#[derive(Deserialize)]
struct RawScenarioMeta {
    #[serde(deserialize_with = "string_like")]
    id: String,
    #[serde(deserialize_with = "string_like")]
    version: String,
    #[serde(rename = "updatedAt", deserialize_with = "string_like")]
    updated_at: String,
    #[serde(default, deserialize_with = "opt_string_like")]
    name: Option<String>,
}

impl From<RawScenarioMeta> for ScenarioMeta {
    fn from(raw: RawScenarioMeta) -> Self {
        let name = raw.name.unwrap_or_else(|| raw.id.clone());
        Self { id: raw.id, version: raw.version, updated_at: raw.updated_at, name }
    }
}

/// Scenario versions stored as `{dir}/{id}_v{version}.json`.
#[derive(Clone)]
pub struct ScenarioStore {
    docs: DocumentStore<ScenarioKey>,
}

impl ScenarioStore {
    pub async fn new<P: Into<PathBuf>>(dir: P) -> Result<Arc<Self>, ServiceError> {
        let docs = DocumentStore::open(dir).await?;
        Ok(Arc::new(Self { docs }))
    }

    pub fn dir(&self) -> &std::path::Path {
        self.docs.dir()
    }

    /// Metadata of every readable scenario; malformed files are skipped.
    pub async fn list(&self) -> Result<Vec<ScenarioMeta>, ServiceError> {
        let raw: Vec<RawScenarioMeta> = self.docs.list_metadata().await?;
        Ok(raw.into_iter().map(ScenarioMeta::from).collect())
    }

    pub async fn get(&self, id: &str, version: &str) -> Result<Value, ServiceError> {
        let key = ScenarioKey::new(id, version)?;
        self.docs.read(&key).await
    }

    /// Create or fully replace one scenario version.
    pub async fn upsert(&self, id: &str, version: &str, document: &Value) -> Result<(), ServiceError> {
        let key = ScenarioKey::new(id, version)?;
        let path = self.docs.write(&key, document).await?;
        let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
        info!(scenario_id = %key.id(), version = %key.version(), %file, "scenario saved");
        Ok(())
    }

    pub async fn delete(&self, id: &str, version: &str) -> Result<(), ServiceError> {
        let key = ScenarioKey::new(id, version)?;
        self.docs.delete(&key).await?;
        info!(scenario_id = %key.id(), version = %key.version(), "scenario removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn setup_store() -> (Arc<ScenarioStore>, PathBuf) {
        let dir = std::env::temp_dir().join(format!("svc_scenarios_{}", uuid::Uuid::new_v4()));
        (ScenarioStore::new(&dir).await.expect("store init"), dir)
    }

    #[tokio::test]
    async fn scenario_crud_and_listing() -> Result<(), anyhow::Error> {
        let (store, dir) = setup_store().await;
        let doc = json!({"id": "s1", "version": "2", "updatedAt": "2024-05-01T10:00:00Z", "name": "Onboarding", "steps": []});
        store.upsert("s1", "2", &doc).await?;
        assert!(dir.join("s1_v2.json").is_file());
        assert_eq!(store.get("s1", "2").await?, doc);

        let list = store.list().await?;
        assert_eq!(
            list,
            vec![ScenarioMeta {
                id: "s1".into(),
                version: "2".into(),
                updated_at: "2024-05-01T10:00:00Z".into(),
                name: "Onboarding".into(),
            }]
        );

        store.delete("s1", "2").await?;
        let err = store.delete("s1", "2").await.unwrap_err();
        assert_eq!(err.to_string(), "Scenario not found: s1 v2");
        assert!(store.list().await?.is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn name_defaults_to_id_and_numbers_are_accepted() -> Result<(), anyhow::Error> {
        let (store, dir) = setup_store().await;
        store.upsert("s2", "1", &json!({"id": "s2", "version": 1, "updatedAt": "t"})).await?;
        let list = store.list().await?;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "s2");
        assert_eq!(list[0].version, "1");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn listing_skips_corrupt_and_incomplete() -> Result<(), anyhow::Error> {
        let (store, dir) = setup_store().await;
        store.upsert("ok", "1", &json!({"id": "ok", "version": "1", "updatedAt": "t"})).await?;
        tokio::fs::write(dir.join("bad_v1.json"), b"{{{").await?;
        // missing updatedAt
        store.upsert("partial", "1", &json!({"id": "partial", "version": "1"})).await?;
        let list = store.list().await?;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "ok");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_identifiers_never_touch_disk() {
        let (store, dir) = setup_store().await;
        let err = store.upsert("../escape", "1", &json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidKey { .. }));
        assert!(!dir.parent().unwrap().join("escape_v1.json").exists());
        let err = store.get("s1", "1_v2").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid scenario version: 1_v2");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
