use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shared_config::AppConfig;

/// Terminal client for Amae Clinic consultations.
#[derive(Debug, Parser)]
#[command(name = "amae-clinic", version, about)]
pub struct Cli {
    /// Overrides `AMAE_API_BASE_URL`.
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Overrides `AMAE_VIDEO_API_BASE_URL`.
    #[arg(long, global = true)]
    pub video_api_base_url: Option<String>,

    /// Overrides `AMAE_STORAGE_PATH`.
    #[arg(long, global = true)]
    pub storage_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(url) = &self.video_api_base_url {
            config.video_api_base_url = url.clone();
        }
        if let Some(path) = &self.storage_path {
            config.storage_path = path.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with username and password.
    Login {
        username: String,

        /// Prompted for when omitted.
        #[arg(long, env = "AMAE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in with a Google identity credential.
    GoogleLogin {
        credential: String,
    },

    /// Forget the stored session.
    Logout,

    /// Open a consultation meeting.
    Meet {
        meeting_id: String,

        /// Appointment this meeting belongs to; enables the start/end prompts
        /// for consultants.
        #[arg(long)]
        appointment_id: Option<String>,

        /// Name shown to other participants.
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        no_mic: bool,

        #[arg(long)]
        no_webcam: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meet_arguments() {
        let cli = Cli::parse_from([
            "amae-clinic",
            "meet",
            "abcd-efgh",
            "--appointment-id",
            "A1",
            "--no-mic",
        ]);

        match cli.command {
            Command::Meet { meeting_id, appointment_id, no_mic, no_webcam, name } => {
                assert_eq!(meeting_id, "abcd-efgh");
                assert_eq!(appointment_id.as_deref(), Some("A1"));
                assert!(no_mic);
                assert!(!no_webcam);
                assert!(name.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::parse_from([
            "amae-clinic",
            "logout",
            "--api-base-url",
            "http://localhost:9000",
            "--storage-path",
            "/tmp/session.json",
        ]);

        let mut config = AppConfig {
            api_base_url: String::new(),
            video_api_base_url: "https://video.example".to_string(),
            storage_path: PathBuf::from(".amae-session.json"),
        };
        cli.apply_overrides(&mut config);

        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.video_api_base_url, "https://video.example");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
