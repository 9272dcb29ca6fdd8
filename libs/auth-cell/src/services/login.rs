use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::SessionTokens;
use shared_models::error::AppError;
use shared_models::ui::{BusyGuard, BusyIndicator};
use shared_storage::SessionContext;
use shared_utils::jwt::profile_from_token;

use crate::models::{Credentials, LoginError, LoginSuccess};
use crate::services::auth_api::{AuthApi, HttpAuthApi};
use crate::services::authenticated::AuthenticatedClient;
use crate::services::survey::SurveySubmitter;

pub const DEFAULT_REDIRECT: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";

/// Login screen logic: validate, authenticate, persist, redirect.
pub struct SessionEntryFlow {
    auth: Arc<dyn AuthApi>,
    session: SessionContext,
    surveys: SurveySubmitter,
    busy: Arc<dyn BusyIndicator>,
}

impl SessionEntryFlow {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        session: SessionContext,
        surveys: SurveySubmitter,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        Self { auth, session, surveys, busy }
    }

    pub fn from_config(config: &AppConfig, session: SessionContext, busy: Arc<dyn BusyIndicator>) -> Self {
        let client = AuthenticatedClient::from_config(config, session.clone());
        Self::new(
            Arc::new(HttpAuthApi::new(config)),
            session,
            SurveySubmitter::new(client),
            busy,
        )
    }

    pub async fn submit(&self, credentials: &mut Credentials) -> Result<LoginSuccess, LoginError> {
        credentials.validate()?;

        let result = {
            let _busy = BusyGuard::new(self.busy.clone());
            self.auth.login(credentials.username.trim(), &credentials.password).await
        };

        match result {
            Ok(tokens) => {
                let success = self.complete_login(&tokens).await?;
                credentials.clear();
                Ok(success)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Sign-in with a Google identity credential; no form fields to check.
    pub async fn submit_google(&self, credential: &str) -> Result<LoginSuccess, LoginError> {
        let result = {
            let _busy = BusyGuard::new(self.busy.clone());
            self.auth.google_login(credential).await
        };

        match result {
            Ok(tokens) => self.complete_login(&tokens).await,
            Err(e) => Err(self.reject(e)),
        }
    }

    pub fn logout(&self) -> Result<String, LoginError> {
        self.session.teardown().map_err(LoginError::Session)?;
        Ok(LOGIN_ROUTE.to_string())
    }

    fn reject(&self, err: AppError) -> LoginError {
        let classified = LoginError::classify(&err);
        warn!("Login failed ({}): {}", classified, err);
        classified
    }

    async fn complete_login(&self, tokens: &SessionTokens) -> Result<LoginSuccess, LoginError> {
        self.session.store_tokens(tokens).map_err(LoginError::Session)?;

        match profile_from_token(&tokens.access_token) {
            Ok(profile) => self.session.store_user_profile(&profile).map_err(LoginError::Session)?,
            Err(e) => debug!("Access token carries no readable profile: {}", e),
        }

        self.session.mark_login_success().map_err(LoginError::Session)?;

        let survey = {
            let _busy = BusyGuard::new(self.busy.clone());
            self.surveys.flush_quietly().await
        };

        let redirect_to = self
            .session
            .take_redirect_target()
            .map_err(LoginError::Session)?
            .unwrap_or_else(|| DEFAULT_REDIRECT.to_string());

        info!("Signed in, redirecting to {}", redirect_to);
        Ok(LoginSuccess { redirect_to, survey })
    }
}
