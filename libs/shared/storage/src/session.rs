use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{SessionTokens, UserProfile};
use shared_models::error::AppError;

use crate::store::{FileStore, KeyValueStore, MemoryStore, StorageKey};

/// Everything the flows share about the current user and tab.
///
/// Cloning is cheap; clones see the same stores.
#[derive(Clone)]
pub struct SessionContext {
    durable: Arc<dyn KeyValueStore>,
    tab: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(durable: Arc<dyn KeyValueStore>, tab: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, tab }
    }

    /// Durable store on disk at the configured path, fresh tab store.
    pub fn open(config: &AppConfig) -> Result<Self, AppError> {
        let durable = FileStore::open(&config.storage_path)?;
        info!("Session store: {}", durable.path().display());
        Ok(Self::new(Arc::new(durable), Arc::new(MemoryStore::new())))
    }

    /// Both scopes in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Same durable store, new tab scope.
    pub fn new_tab(&self) -> Self {
        Self::new(self.durable.clone(), Arc::new(MemoryStore::new()))
    }

    /// Signs the user out: tokens, login flag and profile are removed.
    /// Queued survey data and the redirect target are left for the next login.
    pub fn teardown(&self) -> Result<(), AppError> {
        for key in [
            StorageKey::AccessToken,
            StorageKey::RefreshToken,
            StorageKey::LoginSuccess,
            StorageKey::UserProfile,
        ] {
            self.durable.remove(key)?;
        }
        info!("Session cleared");
        Ok(())
    }

    pub fn access_token(&self) -> Result<Option<String>, AppError> {
        self.durable.get(StorageKey::AccessToken)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, AppError> {
        self.durable.get(StorageKey::RefreshToken)
    }

    pub fn store_tokens(&self, tokens: &SessionTokens) -> Result<(), AppError> {
        self.durable.set(StorageKey::AccessToken, &tokens.access_token)?;
        self.durable.set(StorageKey::RefreshToken, &tokens.refresh_token)
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), AppError> {
        self.durable.set(StorageKey::AccessToken, token)
    }

    pub fn mark_login_success(&self) -> Result<(), AppError> {
        self.durable.set(StorageKey::LoginSuccess, "true")
    }

    pub fn login_succeeded(&self) -> Result<bool, AppError> {
        Ok(self.durable.get(StorageKey::LoginSuccess)?.as_deref() == Some("true"))
    }

    pub fn user_profile(&self) -> Result<Option<UserProfile>, AppError> {
        let Some(raw) = self.durable.get(StorageKey::UserProfile)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Ignoring unreadable user profile: {}", e);
                Ok(None)
            }
        }
    }

    pub fn store_user_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let raw = serde_json::to_string(profile)?;
        self.durable.set(StorageKey::UserProfile, &raw)
    }

    pub fn set_redirect_target(&self, target: &str) -> Result<(), AppError> {
        self.durable.set(StorageKey::RedirectAfterLogin, target)
    }

    /// Returns the stored post-login target and forgets it.
    pub fn take_redirect_target(&self) -> Result<Option<String>, AppError> {
        let target = self.durable.get(StorageKey::RedirectAfterLogin)?;
        if target.is_some() {
            self.durable.remove(StorageKey::RedirectAfterLogin)?;
        }
        Ok(target.filter(|t| !t.is_empty()))
    }

    pub fn queue_survey_payload(&self, payload: &Value) -> Result<(), AppError> {
        let raw = serde_json::to_string(payload)?;
        self.durable.set(StorageKey::SurveySubmissionPayload, &raw)
    }

    pub fn queued_survey_payload(&self) -> Result<Option<Value>, AppError> {
        match self.durable.get(StorageKey::SurveySubmissionPayload)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn clear_survey_payload(&self) -> Result<(), AppError> {
        self.durable.remove(StorageKey::SurveySubmissionPayload)
    }

    pub fn survey_result(&self) -> Result<Option<Value>, AppError> {
        match self.durable.get(StorageKey::SurveySubmissionResult)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn store_survey_result(&self, result: &Value) -> Result<(), AppError> {
        let raw = serde_json::to_string(result)?;
        self.durable.set(StorageKey::SurveySubmissionResult, &raw)
    }

    /// Random id for anonymous participants, created on first use and kept
    /// for the lifetime of this tab scope.
    pub fn temporary_participant_id(&self) -> Result<String, AppError> {
        if let Some(id) = self.tab.get(StorageKey::TempParticipantId)? {
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.tab.set(StorageKey::TempParticipantId, &id)?;
        debug!("Generated temporary participant id {}", id);
        Ok(id)
    }
}
