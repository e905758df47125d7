use crate::foundation::core::{clamp_track_time, round_tenths};

/// Horizontal inset of the track content box; drags are measured against the inner width.
pub const DRAG_INSET_PX: f64 = 4.0;

/// Pixel geometry of an on-screen track, used to map pointer positions to seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackGeometry {
    pub width_px: f64,
    pub duration_secs: f64,
}

impl TrackGeometry {
    pub fn new(width_px: f64, duration_secs: f64) -> Self {
        Self {
            width_px,
            duration_secs,
        }
    }

    /// Time under a click at `x_px` from the track's left edge.
    pub fn time_at(&self, x_px: f64) -> f64 {
        if self.width_px <= 0.0 {
            return 0.0;
        }
        clamp_track_time(x_px * self.duration_secs / self.width_px, self.duration_secs)
    }

    /// Seconds covered by a pointer movement of `dx_px`.
    pub fn drag_delta_secs(&self, dx_px: f64) -> f64 {
        let inner = self.width_px - DRAG_INSET_PX;
        if inner <= 0.0 {
            return 0.0;
        }
        dx_px * self.duration_secs / inner
    }

    /// New keyframe time for a drag that started at `start_secs`, snapped to 0.1 s.
    pub fn dragged_time(&self, start_secs: f64, dx_px: f64) -> f64 {
        let t = clamp_track_time(start_secs + self.drag_delta_secs(dx_px), self.duration_secs);
        round_tenths(t)
    }
}

/// Ruler labels under the tracks, in whole seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeMarkers {
    pub desktop: Vec<u32>,
    pub mobile: Vec<u32>,
}

impl TimeMarkers {
    /// Desktop shows every second, mobile every five seconds.
    pub fn for_duration(duration_secs: f64) -> Self {
        let last = duration_secs.max(0.0).floor() as u32;
        Self {
            desktop: (0..=last).collect(),
            mobile: (0..=last).step_by(5).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/geometry.rs"]
mod tests;
