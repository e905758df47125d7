use crate::foundation::core::{KeyframeId, TrackKind};

/// A timestamped directive on one track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub id: KeyframeId,
    /// Seconds from the start of playback, within `[0, track duration]`.
    pub time: f64,
    pub track: TrackKind,
    /// Renderer animation/emotion name.
    pub value: String,
}

/// Partial update applied by [`crate::timeline::Timeline::update`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframePatch {
    pub time: Option<f64>,
    pub value: Option<String>,
}

impl KeyframePatch {
    pub fn time(secs: f64) -> Self {
        Self {
            time: Some(secs),
            value: None,
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self {
            time: None,
            value: Some(name.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_none() && self.value.is_none()
    }
}

/// Copy of `frames` ordered by time; equal times keep their insertion order.
pub fn sorted_by_time(frames: &[Keyframe]) -> Vec<Keyframe> {
    let mut out = frames.to_vec();
    // `sort_by` is stable, which is what gives simultaneous keyframes FIFO order.
    out.sort_by(|a, b| a.time.total_cmp(&b.time));
    out
}
