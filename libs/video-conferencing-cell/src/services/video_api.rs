use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_http::client::{error_from_response, map_transport_error, parse_body};
use shared_http::ApiClient;
use shared_models::error::AppError;

use crate::models::{JoinToken, ValidateMeetingResponse, VideoConferencingError};

#[async_trait]
pub trait VideoSessionApi: Send + Sync {
    async fn get_token(&self) -> Result<JoinToken, VideoConferencingError>;

    /// Returns the meeting id the room resolves to.
    async fn validate_meeting(
        &self,
        room_id: &str,
        token: &JoinToken,
    ) -> Result<String, VideoConferencingError>;
}

/// Join tokens come from the clinic backend; room validation goes straight
/// to the video provider with the join token as credential.
pub struct HttpVideoSessionApi {
    backend: ApiClient,
    client: Client,
    config: AppConfig,
}

impl HttpVideoSessionApi {
    pub fn new(config: &AppConfig) -> Result<Self, VideoConferencingError> {
        if !config.is_video_conferencing_configured() {
            return Err(VideoConferencingError::Api(AppError::Internal(
                "Video conferencing not configured".to_string(),
            )));
        }

        Ok(Self {
            backend: ApiClient::new(config),
            client: Client::new(),
            config: config.clone(),
        })
    }
}

#[async_trait]
impl VideoSessionApi for HttpVideoSessionApi {
    async fn get_token(&self) -> Result<JoinToken, VideoConferencingError> {
        debug!("Requesting meeting join token");

        self.backend
            .request::<JoinToken>(Method::GET, "/video/get-token", None, None)
            .await
            .map_err(|e| VideoConferencingError::TokenUnavailable {
                message: e.user_message(""),
            })
    }

    async fn validate_meeting(
        &self,
        room_id: &str,
        token: &JoinToken,
    ) -> Result<String, VideoConferencingError> {
        let url = self
            .config
            .video_api_url(&format!("rooms/validate/{}", urlencoding::encode(room_id)));
        debug!("Validating meeting room at {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", token.token.as_str())
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            error!("Meeting validation failed: {} - {}", status, response_text);
            return Err(match error_from_response(status, &response_text) {
                err @ (AppError::NotFound(_)
                | AppError::BadRequest(_)
                | AppError::Auth(_)
                | AppError::Forbidden(_)) => {
                    VideoConferencingError::InvalidMeeting {
                        message: err.user_message("Meeting not found"),
                    }
                }
                err => VideoConferencingError::Api(err),
            });
        }

        let validated: ValidateMeetingResponse = parse_body(&response_text)?;

        if let Some(message) = validated.error {
            return Err(VideoConferencingError::InvalidMeeting { message });
        }

        let meeting_id = validated
            .room_id
            .ok_or_else(|| VideoConferencingError::InvalidMeeting {
                message: "Meeting not found".to_string(),
            })?;

        info!("Meeting room {} validated as {}", room_id, meeting_id);
        Ok(meeting_id)
    }
}
