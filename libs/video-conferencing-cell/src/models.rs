use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// Route parameters of the meeting screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRoute {
    pub room_id: String,
    pub appointment_id: Option<String>,
}

impl MeetingRoute {
    pub fn new(room_id: impl Into<String>, appointment_id: Option<String>) -> Self {
        Self {
            room_id: room_id.into(),
            appointment_id: appointment_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Reads `meetingId` (or its older name `roomId`) and `appointmentId`.
    pub fn from_params<'a, I>(params: I) -> Result<Self, VideoConferencingError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut room_id = None;
        let mut appointment_id = None;

        for (key, value) in params {
            match key {
                "meetingId" => room_id = Some(value.to_string()),
                "roomId" if room_id.is_none() => room_id = Some(value.to_string()),
                "appointmentId" => appointment_id = Some(value.to_string()),
                _ => {}
            }
        }

        let room_id = room_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(VideoConferencingError::MissingMeetingId)?;

        Ok(Self::new(room_id, appointment_id))
    }
}

/// Short-lived credential authorizing entry to a room.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinToken {
    pub token: String,
}

impl fmt::Debug for JoinToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JoinToken(..)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMeetingResponse {
    pub room_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSettings {
    pub mic_enabled: bool,
    pub webcam_enabled: bool,
    pub display_name: String,
    pub participant_id: Option<String>,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            mic_enabled: true,
            webcam_enabled: true,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            participant_id: None,
        }
    }
}

/// Everything the meeting SDK needs to create a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingJoinConfig {
    pub meeting_id: String,
    pub token: JoinToken,
    pub participant_id: String,
    pub display_name: String,
    pub mic_enabled: bool,
    pub webcam_enabled: bool,
}

/// Answer to the end-of-consultation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndPrompt {
    Confirmed { note: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Joined { appointment_started: bool },
    /// The consultant dismissed the start prompt.
    Declined,
    /// The start request failed; the meeting was not joined.
    LifecycleUpdateFailed,
    JoinFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    Left { appointment_ended: bool },
    /// The consultant dismissed the end prompt; the meeting stays open.
    Cancelled,
    /// The end request failed; the meeting stays open.
    LifecycleUpdateFailed,
}

/// User-visible notices raised by the meeting flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingNotice {
    TokenUnavailable(String),
    MeetingInvalid(String),
    MediaUnavailable(String),
    JoinFailed(String),
    LifecycleUpdateFailed(String),
}

impl MeetingNotice {
    pub fn message(&self) -> &str {
        match self {
            MeetingNotice::TokenUnavailable(msg)
            | MeetingNotice::MeetingInvalid(msg)
            | MeetingNotice::MediaUnavailable(msg)
            | MeetingNotice::JoinFailed(msg)
            | MeetingNotice::LifecycleUpdateFailed(msg) => msg,
        }
    }
}

#[derive(Error, Debug)]
pub enum VideoConferencingError {
    #[error("Meeting id missing from route")]
    MissingMeetingId,

    #[error("Meeting is not valid: {message}")]
    InvalidMeeting { message: String },

    #[error("Could not obtain a join token: {message}")]
    TokenUnavailable { message: String },

    #[error("Meeting is not in a state that allows this operation: {phase}")]
    InvalidMeetingState { phase: String },

    #[error("Media devices unavailable: {message}")]
    MediaUnavailable { message: String },

    #[error("Meeting SDK error: {message}")]
    SdkError { message: String },

    #[error(transparent)]
    Api(#[from] AppError),
}

impl VideoConferencingError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            VideoConferencingError::Api(err) => err.user_message(fallback),
            VideoConferencingError::InvalidMeeting { message }
            | VideoConferencingError::TokenUnavailable { message }
            | VideoConferencingError::MediaUnavailable { message }
            | VideoConferencingError::SdkError { message } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
