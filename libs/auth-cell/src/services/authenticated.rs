use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::error::AppError;
use shared_storage::SessionContext;

use crate::services::auth_api::{HttpAuthApi, TokenRefresher};

/// Backend client that attaches the stored access token and owns the
/// refresh policy: on an authorization failure the token is refreshed once
/// and the call retried once. A second authorization failure is returned.
#[derive(Clone)]
pub struct AuthenticatedClient {
    api: ApiClient,
    session: SessionContext,
    refresher: Arc<dyn TokenRefresher>,
}

impl AuthenticatedClient {
    pub fn new(api: ApiClient, session: SessionContext, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self { api, session, refresher }
    }

    pub fn from_config(config: &AppConfig, session: SessionContext) -> Self {
        let api = ApiClient::new(config);
        let refresher = Arc::new(HttpAuthApi::with_client(api.clone()));
        Self::new(api, session, refresher)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn current_token(&self) -> Result<String, AppError> {
        self.session
            .access_token()?
            .ok_or_else(|| AppError::Auth("Not signed in".to_string()))
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<&Value>) -> Result<T, AppError>
    where T: DeserializeOwned {
        let token = self.current_token()?;

        // Only a 401 means the token went stale; a 403 is returned as is.
        match self.api.request(method.clone(), path, Some(&token), body).await {
            Err(err) if err.is_auth() => {
                warn!("Authorization failed for {} {}, refreshing token", method, path);
                self.refresh_access_token().await?;

                // Re-read: the refresh has already written the new token.
                let token = self.current_token()?;
                self.api.request(method, path, Some(&token), body).await
            }
            other => other,
        }
    }

    async fn refresh_access_token(&self) -> Result<(), AppError> {
        let refresh_token = self
            .session
            .refresh_token()?
            .ok_or_else(|| AppError::Auth("No refresh token stored".to_string()))?;

        let access_token = self.refresher.refresh(&refresh_token).await?;
        self.session.set_access_token(&access_token)?;
        debug!("Access token refreshed");
        Ok(())
    }
}
