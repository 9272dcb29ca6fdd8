//! Terminal stand-ins for the meeting SDK and capture devices. They log what
//! a real binding would do so the consultation flow can be driven end to end.

use async_trait::async_trait;
use tracing::info;

use video_conferencing_cell::{
    LocalMediaStream, MediaDevices, MediaTrack, MeetingHandle, MeetingJoinConfig, MeetingSdk,
    TrackKind, VideoConferencingError,
};

pub struct LoggingMeetingSdk;

impl MeetingSdk for LoggingMeetingSdk {
    fn create_meeting(
        &self,
        config: &MeetingJoinConfig,
    ) -> Result<Box<dyn MeetingHandle>, VideoConferencingError> {
        info!(
            "Creating meeting {} as {} ({}), mic {}, webcam {}",
            config.meeting_id,
            config.display_name,
            config.participant_id,
            config.mic_enabled,
            config.webcam_enabled
        );
        Ok(Box::new(LoggingMeetingHandle {
            meeting_id: config.meeting_id.clone(),
        }))
    }
}

struct LoggingMeetingHandle {
    meeting_id: String,
}

impl MeetingHandle for LoggingMeetingHandle {
    fn join(&self) -> Result<(), VideoConferencingError> {
        info!("SDK join {}", self.meeting_id);
        Ok(())
    }

    fn leave(&self) {
        info!("SDK leave {}", self.meeting_id);
    }

    fn set_mic(&self, enabled: bool) {
        info!("SDK mic {}", if enabled { "on" } else { "off" });
    }

    fn set_webcam(&self, enabled: bool) {
        info!("SDK webcam {}", if enabled { "on" } else { "off" });
    }
}

pub struct PlaceholderDevices;

#[async_trait]
impl MediaDevices for PlaceholderDevices {
    async fn acquire(&self, audio: bool, video: bool) -> Result<LocalMediaStream, VideoConferencingError> {
        let mut tracks: Vec<Box<dyn MediaTrack>> = Vec::new();
        if audio {
            tracks.push(Box::new(PlaceholderTrack(TrackKind::Audio)));
        }
        if video {
            tracks.push(Box::new(PlaceholderTrack(TrackKind::Video)));
        }
        info!("Opened {} local tracks", tracks.len());
        Ok(LocalMediaStream::new(tracks))
    }
}

struct PlaceholderTrack(TrackKind);

impl MediaTrack for PlaceholderTrack {
    fn kind(&self) -> TrackKind {
        self.0
    }

    fn stop(&self) {
        info!("Stopped {:?} track", self.0);
    }
}
