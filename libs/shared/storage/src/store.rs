use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use shared_models::error::AppError;

/// Keys the client persists. The string forms match what earlier builds of
/// the web client wrote, so existing sessions keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    LoginSuccess,
    SurveySubmissionPayload,
    SurveySubmissionResult,
    UserProfile,
    RedirectAfterLogin,
    TempParticipantId,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "accessToken",
            StorageKey::RefreshToken => "refreshToken",
            StorageKey::LoginSuccess => "loginSuccess",
            StorageKey::SurveySubmissionPayload => "surveySubmissionPayload",
            StorageKey::SurveySubmissionResult => "surveySubmissionResult",
            StorageKey::UserProfile => "userProfile",
            StorageKey::RedirectAfterLogin => "redirectAfterLogin",
            StorageKey::TempParticipantId => "tempParticipantId",
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError>;
    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: StorageKey) -> Result<(), AppError>;
}

fn poisoned() -> AppError {
    AppError::Storage("store lock poisoned".to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.as_str(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key.as_str());
        Ok(())
    }
}

/// JSON object on disk, rewritten on every mutation.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding unreadable session store {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        debug!("Opened session store at {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), AppError> {
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents).map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    // Mutations are written to disk first; memory only changes once the
    // write succeeded.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let mut next = entries.clone();
        next.insert(key.as_str().to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), AppError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if !entries.contains_key(key.as_str()) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key.as_str());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(StorageKey::AccessToken).unwrap(), None);

        store.set(StorageKey::AccessToken, "abc").unwrap();
        assert_eq!(store.get(StorageKey::AccessToken).unwrap().as_deref(), Some("abc"));

        store.remove(StorageKey::AccessToken).unwrap();
        assert_eq!(store.get(StorageKey::AccessToken).unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set(StorageKey::RefreshToken, "refresh-1").unwrap();
            store.set(StorageKey::LoginSuccess, "true").unwrap();
            store.remove(StorageKey::LoginSuccess).unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(StorageKey::RefreshToken).unwrap().as_deref(), Some("refresh-1"));
        assert_eq!(reopened.get(StorageKey::LoginSuccess).unwrap(), None);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        fs::create_dir(&state).unwrap();

        let store = FileStore::open(state.join("session.json")).unwrap();
        store.set(StorageKey::AccessToken, "access-1").unwrap();

        fs::remove_dir_all(&state).unwrap();

        assert!(matches!(store.set(StorageKey::AccessToken, "access-2"), Err(AppError::Storage(_))));
        assert!(store.remove(StorageKey::AccessToken).is_err());
        assert_eq!(store.get(StorageKey::AccessToken).unwrap().as_deref(), Some("access-1"));
    }

    #[test]
    fn test_file_store_discards_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(StorageKey::AccessToken).unwrap(), None);
    }
}
