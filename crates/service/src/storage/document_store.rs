use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use super::{key::ResourceKey, locks::KeyLocks};
use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// Each key maps to one file under `dir`. Documents are opaque JSON and are
/// replaced whole on every write (temp file + rename), so readers never see a
/// half-written document.
pub struct DocumentStore<K> {
    dir: PathBuf,
    locks: KeyLocks,
    _key: PhantomData<fn(&K)>,
}

impl<K> Clone for DocumentStore<K> {
    fn clone(&self) -> Self {
        Self { dir: self.dir.clone(), locks: self.locks.clone(), _key: PhantomData }
    }
}

impl<K: ResourceKey> DocumentStore<K> {
    /// Bind a store to `dir`, creating it if missing.
    pub async fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir, locks: KeyLocks::new(), _key: PhantomData })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &K) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Read and parse the stored document. A malformed file is an error here,
    /// unlike in [`DocumentStore::list_metadata`].
    pub async fn read(&self, key: &K) -> Result<Value, ServiceError> {
        let path = self.path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ServiceError::not_found(K::KIND, key.describe()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| ServiceError::Corrupt { path, source })
    }

    /// Replace the document for `key`; returns the final path.
    pub async fn write(&self, key: &K, document: &Value) -> Result<PathBuf, ServiceError> {
        let path = self.path(key);
        let data = serde_json::to_vec_pretty(document)?;

        let _guard = self.locks.lock(&key.lock_key()).await;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.dir.join(format!(".{}.{}.tmp", key.file_name(), uuid::Uuid::new_v4()));
        if let Err(e) = replace_via(&tmp, &path, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), bytes = data.len(), "document written");
        Ok(path)
    }

    pub async fn delete(&self, key: &K) -> Result<(), ServiceError> {
        let path = self.path(key);
        let _guard = self.locks.lock(&key.lock_key()).await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::not_found(K::KIND, key.describe())),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse every `*.json` file in the directory into `M`, in file-name order.
    ///
    /// Files that fail to read or deserialize are logged and skipped; only a
    /// failure to enumerate the directory itself is returned as an error.
    pub async fn list_metadata<M: DeserializeOwned>(&self) -> Result<Vec<M>, ServiceError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !is_json || hidden {
                continue;
            }
            match entry.file_type().await {
                Ok(ft) if ft.is_file() => paths.push(path),
                _ => continue,
            }
        }
        paths.sort();

        let mut out = Vec::with_capacity(paths.len());
        for path in paths {
            match read_as::<M>(&path).await {
                Ok(meta) => out.push(meta),
                Err(reason) => {
                    let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
                    warn!(kind = K::KIND, %file, %reason, "skipping unreadable document");
                }
            }
        }
        Ok(out)
    }
}

async fn replace_via(tmp: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    fs::write(tmp, data).await?;
    fs::rename(tmp, path).await
}

async fn read_as<M: DeserializeOwned>(path: &Path) -> Result<M, String> {
    let bytes = fs::read(path).await.map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}
