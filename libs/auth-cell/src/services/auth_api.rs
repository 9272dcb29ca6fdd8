use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::auth::{
    GoogleLoginRequest, LoginRequest, RefreshTokenRequest, RefreshedToken, SessionTokens,
};
use shared_models::error::AppError;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<SessionTokens, AppError>;

    async fn google_login(&self, credential: &str) -> Result<SessionTokens, AppError>;
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<String, AppError>;
}

pub struct HttpAuthApi {
    api: ApiClient,
}

impl HttpAuthApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<SessionTokens, AppError> {
        debug!("Logging in user {}", username);

        let body = serde_json::to_value(LoginRequest { username, password })?;
        let tokens: SessionTokens = self
            .api
            .request(Method::POST, "/auth/login", None, Some(&body))
            .await?;

        info!("Login succeeded for {}", username);
        Ok(tokens)
    }

    async fn google_login(&self, credential: &str) -> Result<SessionTokens, AppError> {
        debug!("Logging in with Google credential");

        let body = serde_json::to_value(GoogleLoginRequest { credential })?;
        let tokens: SessionTokens = self
            .api
            .request(Method::POST, "/auth/google-login", None, Some(&body))
            .await?;

        info!("Google login succeeded");
        Ok(tokens)
    }
}

#[async_trait]
impl TokenRefresher for HttpAuthApi {
    async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        debug!("Refreshing access token");

        let body = serde_json::to_value(RefreshTokenRequest { refresh_token })?;
        let refreshed: RefreshedToken = self
            .api
            .request(Method::POST, "/auth/refresh-token", None, Some(&body))
            .await?;

        Ok(refreshed.access_token)
    }
}
