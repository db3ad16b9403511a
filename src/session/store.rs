//! Saved role preference storage
//!
//! The web client remembers the last role a user switched to. Here that
//! memory sits behind [`RolePreferenceStore`] so the server, the CLI and
//! tests can pick an in-memory or file-backed implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

use super::error::SessionResult;
use super::role::Role;

/// Storage for each user's last chosen role
#[async_trait]
pub trait RolePreferenceStore: Send + Sync {
    /// Raw saved value; may name a role the user no longer holds
    async fn load(&self, user_id: &str) -> SessionResult<Option<String>>;

    /// Remember the chosen role
    async fn save(&self, user_id: &str, role: Role) -> SessionResult<()>;

    /// Forget any saved choice
    async fn clear(&self, user_id: &str) -> SessionResult<()>;
}

/// Process-local preference store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RolePreferenceStore for MemoryPreferenceStore {
    async fn load(&self, user_id: &str) -> SessionResult<Option<String>> {
        Ok(self.entries.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, role: Role) -> SessionResult<()> {
        self.entries
            .write()
            .await
            .insert(user_id.to_string(), role.to_string());
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> SessionResult<()> {
        self.entries.write().await.remove(user_id);
        Ok(())
    }
}

/// Preference store persisted as a JSON object of user id -> role
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> SessionResult<HashMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Atomic replace via sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RolePreferenceStore for FilePreferenceStore {
    async fn load(&self, user_id: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(user_id))
    }

    async fn save(&self, user_id: &str, role: Role) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(user_id.to_string(), role.to_string());
        self.write_all(&entries).await?;
        tracing::debug!(user_id = %user_id, role = %role, path = ?self.path, "Saved role preference");
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(user_id).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.load("user-1").await.unwrap(), None);

        store.save("user-1", Role::Coach).await.unwrap();
        assert_eq!(store.load("user-1").await.unwrap().as_deref(), Some("coach"));

        store.clear("user-1").await.unwrap();
        assert_eq!(store.load("user-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs").join("roles.json");

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.load("user-1").await.unwrap(), None);

        store.save("user-1", Role::OrgAdmin).await.unwrap();
        store.save("user-2", Role::Client).await.unwrap();

        // A fresh store over the same file sees both entries
        let reopened = FilePreferenceStore::new(&path);
        assert_eq!(
            reopened.load("user-1").await.unwrap().as_deref(),
            Some("org_admin")
        );
        assert_eq!(
            reopened.load("user-2").await.unwrap().as_deref(),
            Some("client")
        );

        reopened.clear("user-1").await.unwrap();
        assert_eq!(store.load("user-1").await.unwrap(), None);
        assert_eq!(store.load("user-2").await.unwrap().as_deref(), Some("client"));
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert!(store.load("user-1").await.is_err());
    }
}
