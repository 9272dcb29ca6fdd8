use std::path::PathBuf;
use chrono::{Duration, Utc};
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{SessionTokens, UserProfile};
use shared_storage::SessionContext;

pub struct TestConfig {
    pub api_base_url: String,
    pub video_api_base_url: String,
    pub storage_path: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            video_api_base_url: "http://localhost:8081".to_string(),
            storage_path: std::env::temp_dir().join("amae-test-session.json"),
        }
    }
}

impl TestConfig {
    /// Backend and video service both served by one mock server.
    pub fn with_mock(uri: &str) -> Self {
        Self {
            api_base_url: uri.to_string(),
            video_api_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            video_api_base_url: self.video_api_base_url.clone(),
            storage_path: self.storage_path.clone(),
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn consultant(email: &str) -> Self {
        Self::new(email, "consultant")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            name: Some("Test User".to_string()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }

    /// Session with this user's profile and a token pair already stored.
    pub fn signed_in_session(&self, access_token: &str, refresh_token: &str) -> SessionContext {
        let session = SessionContext::in_memory();
        session
            .store_tokens(&SessionTokens {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
            })
            .expect("memory store accepts tokens");
        session
            .store_user_profile(&self.to_profile())
            .expect("memory store accepts profile");
        session
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Token in JWT shape. The signature segment is filler; the client never
    /// verifies it.
    pub fn create_test_token(user: &TestUser, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "user_metadata": { "full_name": "Test User" },
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode("test-signature");

        format!("{}.{}.{}", header_encoded, payload_encoded, signature_encoded)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockApiResponses;

impl MockApiResponses {
    pub fn tokens_response(access_token: &str, refresh_token: &str) -> serde_json::Value {
        json!({
            "accessToken": access_token,
            "refreshToken": refresh_token
        })
    }

    pub fn refreshed_token_response(access_token: &str) -> serde_json::Value {
        json!({
            "accessToken": access_token
        })
    }

    pub fn appointment_response(appointment_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "status": status,
            "consultantId": Uuid::new_v4(),
            "customerId": Uuid::new_v4(),
            "startTime": "2024-12-25T10:00:00Z",
            "endTime": "2024-12-25T10:30:00Z"
        })
    }

    pub fn join_token_response(token: &str) -> serde_json::Value {
        json!({
            "token": token
        })
    }

    pub fn validate_meeting_response(room_id: &str) -> serde_json::Value {
        json!({
            "roomId": room_id,
            "disabled": false
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_mock("http://127.0.0.1:5555").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:5555");
        assert_eq!(config.video_api_base_url, "http://127.0.0.1:5555");
        assert!(config.is_configured());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::consultant("doc@example.com");
        assert_eq!(user.role, "consultant");
        assert!(user.to_profile().is_consultant());
        assert!(!TestUser::patient("p@example.com").to_profile().is_consultant());
    }

    #[test]
    fn test_signed_in_session() {
        let user = TestUser::default();
        let session = user.signed_in_session("a", "r");

        assert_eq!(session.access_token().unwrap().as_deref(), Some("a"));
        assert_eq!(session.user_profile().unwrap().unwrap().id, user.id);
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = JwtTestUtils::create_test_token(&TestUser::default(), None);
        assert_eq!(token.split('.').count(), 3);
    }
}
