pub mod flow;
pub mod identity;
pub mod media;
pub mod meeting;
pub mod video_api;

pub use flow::{ConsultationMeetingFlow, MeetingServices, MeetingUi};
pub use identity::{derive_participant_id, resolve_participant_id};
pub use media::{LocalMediaStream, MediaDevices, MediaTrack, TrackKind};
pub use meeting::{MeetingHandle, MeetingSdk, MeetingSession};
pub use video_api::{HttpVideoSessionApi, VideoSessionApi};
