// libs/video-conferencing-cell/src/lib.rs
//! # Video Conferencing Cell
//!
//! Client side of a consultation call: resolving the meeting from the route,
//! obtaining a join token, gating the appointment lifecycle on its status, and
//! driving the meeting SDK through join and leave.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |                   Video Cell                        |
//! +-----------------------------------------------------+
//! |  models.rs      |  Route, settings, outcomes, errors|
//! |  services/      |                                   |
//! |    video_api.rs |  Join token + room validation     |
//! |    identity.rs  |  Participant id derivation        |
//! |    media.rs     |  Local capture streams            |
//! |    meeting.rs   |  SDK seam, leave-once session     |
//! |    flow.rs      |  Consultation Meeting Flow        |
//! +-----------------------------------------------------+
//! ```
//!
//! ## Lifecycle gate
//!
//! When the route names an appointment and the signed-in user is a
//! consultant, start and end intents read the appointment status first:
//!
//! - start from `CONFIRMED` asks for confirmation, sends the start request,
//!   then joins; any other status joins directly
//! - end from `ON_GOING` asks for a closing note, sends the end request, then
//!   leaves; any other status leaves directly
//! - a status check that fails still asks for confirmation
//!
//! ## Cleanup
//!
//! [`services::MeetingSession`] leaves the SDK meeting and stops local tracks
//! exactly once, whether through an explicit leave, a failed join, or drop.
//!
//! ## Configuration
//!
//! - `AMAE_API_BASE_URL` - clinic backend, serves `/video/get-token`
//! - `AMAE_VIDEO_API_BASE_URL` - video provider API (optional, defaults to production)

pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::{
    EndOutcome, EndPrompt, JoinToken, MeetingJoinConfig, MeetingNotice, MeetingRoute,
    MeetingSettings, StartOutcome, VideoConferencingError,
};

pub use services::{
    ConsultationMeetingFlow, HttpVideoSessionApi, LocalMediaStream, MediaDevices, MediaTrack,
    MeetingHandle, MeetingSdk, MeetingServices, MeetingSession, MeetingUi, TrackKind,
    VideoSessionApi,
};
