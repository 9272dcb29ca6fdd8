use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_VIDEO_API_BASE_URL: &str = "https://api.videosdk.live/v2";
pub const DEFAULT_STORAGE_PATH: &str = ".amae-session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub video_api_base_url: String,
    pub storage_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("AMAE_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("AMAE_API_BASE_URL not set, using empty value");
                    String::new()
                }),
            video_api_base_url: env::var("AMAE_VIDEO_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("AMAE_VIDEO_API_BASE_URL not set, using default");
                    DEFAULT_VIDEO_API_BASE_URL.to_string()
                }),
            storage_path: env::var("AMAE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    pub fn is_video_conferencing_configured(&self) -> bool {
        !self.video_api_base_url.is_empty()
    }

    /// Joins `path` onto the video API base URL without doubling the slash.
    pub fn video_api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.video_api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
