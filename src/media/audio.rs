use crate::foundation::core::ElementId;
use crate::foundation::error::{AvatarError, AvatarResult};

/// Read-only view of an audio element's playback clock.
///
/// `current_time` is non-decreasing while playing; schedulers only ever read it.
pub trait AudioClock {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
}

/// Playable audio element bound to one source URL at a time.
pub trait AudioElement: AudioClock {
    fn id(&self) -> ElementId;
    /// Currently bound source URL, if any.
    fn source(&self) -> Option<&str>;
    /// Bind a new source. Resets position, paused and ended flags.
    fn load(&mut self, url: &str, duration_secs: f64) -> AvatarResult<()>;
    fn duration(&self) -> Option<f64>;
    /// Seek. Seeking clears the ended flag.
    fn set_current_time(&mut self, secs: f64);
    fn play(&mut self) -> AvatarResult<()>;
    fn pause(&mut self);
}

/// Deterministic audio element whose clock is advanced explicitly.
#[derive(Debug)]
pub struct SimulatedAudio {
    id: ElementId,
    source: Option<String>,
    duration: Option<f64>,
    position: f64,
    paused: bool,
    ended: bool,
    fail_next_play: bool,
}

impl SimulatedAudio {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            source: None,
            duration: None,
            position: 0.0,
            paused: true,
            ended: false,
            fail_next_play: false,
        }
    }

    /// Make the next `play()` fail, as a decode or autoplay-policy error would.
    pub fn fail_next_play(&mut self) {
        self.fail_next_play = true;
    }

    /// Advance playback by `secs`. Returns `true` when this step reached the end.
    pub fn advance(&mut self, secs: f64) -> bool {
        if self.paused || self.ended {
            return false;
        }
        let Some(duration) = self.duration else {
            return false;
        };
        self.position = (self.position + secs.max(0.0)).min(duration);
        if self.position >= duration {
            self.ended = true;
            self.paused = true;
            tracing::debug!(element = %self.id, duration, "simulated audio ended");
            return true;
        }
        false
    }
}

impl AudioClock for SimulatedAudio {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn ended(&self) -> bool {
        self.ended
    }
}

impl AudioElement for SimulatedAudio {
    fn id(&self) -> ElementId {
        self.id
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, url: &str, duration_secs: f64) -> AvatarResult<()> {
        if url.is_empty() {
            return Err(AvatarError::validation("audio source url must not be empty"));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(AvatarError::playback(format!(
                "audio '{url}' has no playable duration"
            )));
        }
        self.source = Some(url.to_owned());
        self.duration = Some(duration_secs);
        self.position = 0.0;
        self.paused = true;
        self.ended = false;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_current_time(&mut self, secs: f64) {
        let max = self.duration.unwrap_or(0.0);
        self.position = if secs.is_finite() {
            secs.clamp(0.0, max)
        } else {
            0.0
        };
        self.ended = false;
    }

    fn play(&mut self) -> AvatarResult<()> {
        if std::mem::take(&mut self.fail_next_play) {
            return Err(AvatarError::playback("audio element refused to play"));
        }
        if self.source.is_none() || self.duration.is_none() {
            return Err(AvatarError::playback("audio element has no source"));
        }
        if self.ended {
            self.position = 0.0;
            self.ended = false;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/audio.rs"]
mod tests;
