use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::models::VideoConferencingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A capture track held by the local device layer.
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    fn stop(&self);
}

#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn acquire(&self, audio: bool, video: bool) -> Result<LocalMediaStream, VideoConferencingError>;
}

/// Tracks captured for preview or the call. Each track is stopped exactly
/// once, on [`release`](Self::release) or on drop.
pub struct LocalMediaStream {
    tracks: Vec<Box<dyn MediaTrack>>,
    released: AtomicBool,
}

impl LocalMediaStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            tracks,
            released: AtomicBool::new(false),
        }
    }

    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Returns `false` if the stream was already released.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::SeqCst) {
            return false;
        }

        for track in &self.tracks {
            track.stop();
        }
        debug!("Released {} local media tracks", self.tracks.len());
        true
    }
}

impl Drop for LocalMediaStream {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;

    pub struct CountingTrack {
        pub kind: TrackKind,
        pub stops: Arc<AtomicUsize>,
    }

    impl MediaTrack for CountingTrack {
        fn kind(&self) -> TrackKind {
            self.kind
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn counted_stream(stops: &Arc<AtomicUsize>) -> LocalMediaStream {
        LocalMediaStream::new(vec![
            Box::new(CountingTrack { kind: TrackKind::Audio, stops: stops.clone() }),
            Box::new(CountingTrack { kind: TrackKind::Video, stops: stops.clone() }),
        ])
    }
}
