use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::models::{MeetingJoinConfig, VideoConferencingError};
use crate::services::media::LocalMediaStream;

/// Entry point of the meeting SDK.
pub trait MeetingSdk: Send + Sync {
    fn create_meeting(
        &self,
        config: &MeetingJoinConfig,
    ) -> Result<Box<dyn MeetingHandle>, VideoConferencingError>;
}

/// One SDK meeting instance.
#[cfg_attr(test, mockall::automock)]
pub trait MeetingHandle: Send + Sync {
    fn join(&self) -> Result<(), VideoConferencingError>;

    fn leave(&self);

    fn set_mic(&self, enabled: bool);

    fn set_webcam(&self, enabled: bool);
}

/// A joined meeting. Leaving happens exactly once: through
/// [`leave`](Self::leave), or on drop if the owner goes away first.
pub struct MeetingSession {
    meeting_id: String,
    handle: Box<dyn MeetingHandle>,
    media: Option<LocalMediaStream>,
    left: AtomicBool,
}

impl MeetingSession {
    /// Joins through `handle`. On failure the session is torn down before
    /// the error is returned.
    pub fn join(
        meeting_id: impl Into<String>,
        handle: Box<dyn MeetingHandle>,
        media: Option<LocalMediaStream>,
    ) -> Result<Self, VideoConferencingError> {
        let session = Self {
            meeting_id: meeting_id.into(),
            handle,
            media,
            left: AtomicBool::new(false),
        };

        session.handle.join()?;
        info!("Joined meeting {}", session.meeting_id);
        Ok(session)
    }

    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    pub fn has_left(&self) -> bool {
        self.left.load(Ordering::SeqCst)
    }

    pub fn set_mic(&self, enabled: bool) {
        if !self.has_left() {
            self.handle.set_mic(enabled);
        }
    }

    pub fn set_webcam(&self, enabled: bool) {
        if !self.has_left() {
            self.handle.set_webcam(enabled);
        }
    }

    /// Returns `false` when the session had already left.
    pub fn leave(&self) -> bool {
        if self.left.swap(true, Ordering::SeqCst) {
            debug!("Meeting {} already left", self.meeting_id);
            return false;
        }

        self.handle.leave();
        if let Some(media) = &self.media {
            media.release();
        }
        info!("Left meeting {}", self.meeting_id);
        true
    }
}

impl Drop for MeetingSession {
    fn drop(&mut self) {
        if !self.has_left() {
            warn!("Meeting {} torn down without leaving, leaving now", self.meeting_id);
            self.leave();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;
    use crate::services::media::test_support::counted_stream;

    fn joined_handle() -> MockMeetingHandle {
        let mut handle = MockMeetingHandle::new();
        handle.expect_join().times(1).returning(|| Ok(()));
        handle
    }

    #[test]
    fn test_leave_twice_is_a_no_op() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut handle = joined_handle();
        handle.expect_leave().times(1).return_const(());

        let session = MeetingSession::join("M1", Box::new(handle), Some(counted_stream(&stops))).unwrap();

        assert!(session.leave());
        assert!(!session.leave());
        drop(session);

        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_without_leave_cleans_up() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut handle = joined_handle();
        handle.expect_leave().times(1).return_const(());

        let session = MeetingSession::join("M1", Box::new(handle), Some(counted_stream(&stops))).unwrap();
        drop(session);

        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_join_releases_media_and_leaves() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut handle = MockMeetingHandle::new();
        handle.expect_join().times(1).returning(|| {
            Err(VideoConferencingError::SdkError { message: "socket closed".to_string() })
        });
        handle.expect_leave().times(1).return_const(());

        let result = MeetingSession::join("M1", Box::new(handle), Some(counted_stream(&stops)));

        assert!(matches!(result, Err(VideoConferencingError::SdkError { .. })));
        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_toggles_are_ignored_after_leave() {
        let mut handle = joined_handle();
        handle.expect_set_mic().with(mockall::predicate::eq(false)).times(1).return_const(());
        handle.expect_set_webcam().times(0);
        handle.expect_leave().times(1).return_const(());

        let session = MeetingSession::join("M1", Box::new(handle), None).unwrap();
        session.set_mic(false);
        session.leave();
        session.set_webcam(false);
    }
}
