use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Kind of media carried by a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Lifecycle state of a track. Stopping is permanent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackReadyState {
    Live,
    Ended,
}

/// Handle to a live media source (canvas capture, audio destination, ...).
///
/// Clones share state: stopping any clone ends the track for every holder, which is how a
/// recorder's stream and the renderer's capture observe the same teardown.
#[derive(Clone, Debug)]
pub struct MediaTrack {
    id: u64,
    kind: MediaKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: MediaKind, label: impl Into<String>) -> Self {
        Self {
            id: NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ready_state(&self) -> TrackReadyState {
        if self.live.load(Ordering::Acquire) {
            TrackReadyState::Live
        } else {
            TrackReadyState::Ended
        }
    }

    pub fn is_live(&self) -> bool {
        self.ready_state() == TrackReadyState::Live
    }

    /// Idempotent.
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::AcqRel) {
            tracing::debug!(track = self.id, kind = ?self.kind, "stopped media track");
        }
    }
}

/// Ordered set of tracks.
#[derive(Clone, Debug, Default)]
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    /// Combine the video tracks of `video` with the audio tracks of `audio`.
    pub fn combine(video: &MediaStream, audio: &MediaStream) -> Self {
        let tracks = video
            .video_tracks()
            .chain(audio.audio_tracks())
            .cloned()
            .collect();
        Self { tracks }
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind == MediaKind::Video)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind == MediaKind::Audio)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    pub fn any_live(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/stream.rs"]
mod tests;
