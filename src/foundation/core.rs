use std::fmt;

/// Length of the authoring timeline in seconds.
pub const TRACK_DURATION_SECS: f64 = 30.0;

/// One of the two independent keyframe tracks.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Body pose ("action") track.
    Action,
    /// Facial emotion track.
    Emotion,
}

impl TrackKind {
    /// Both tracks in scheduling order.
    pub const ALL: [TrackKind; 2] = [TrackKind::Action, TrackKind::Emotion];

    /// Lowercase track name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Emotion => "emotion",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a keyframe within one timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct KeyframeId(pub u64);

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kf-{}", self.0)
    }
}

/// Identity of an audio element. Audio graphs are bound to exactly one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio#{}", self.0)
    }
}

/// Clamp a keyframe time into `[0, duration]`. Non-finite input maps to 0.
pub fn clamp_track_time(secs: f64, duration: f64) -> f64 {
    if !secs.is_finite() {
        return 0.0;
    }
    secs.clamp(0.0, duration.max(0.0))
}

/// Round seconds to one decimal place (drag resolution).
pub fn round_tenths(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}

/// Convert audio clock seconds into elapsed milliseconds.
pub fn secs_to_ms(secs: f64) -> f64 {
    if secs.is_finite() { secs * 1000.0 } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
