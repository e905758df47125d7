use crate::foundation::core::TRACK_DURATION_SECS;
use crate::foundation::error::{AvatarError, AvatarResult};
use std::path::Path;
use std::time::Duration;

/// Tunables for scheduling, synthesis validation and recording.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Animation scheduler polling period.
    pub tick_interval_ms: u64,
    /// Display refresh period used by the cooperative loop for the viseme synchronizer.
    pub frame_interval_ms: u64,
    /// Timeline length in seconds.
    pub track_duration_secs: f64,
    /// Keyframes at or before this time are applied as soon as a pass starts.
    pub prime_window_secs: f64,
    /// Maximum number of characters accepted for synthesis.
    pub max_text_chars: usize,
    /// Pose name used for idle/reset.
    pub idle_action: String,
    /// Period at which the recorder hands over encoded chunks.
    pub recorder_timeslice_ms: u64,
    /// Video bitrate hint passed to the recorder.
    pub video_bits_per_second: u32,
    /// Prefix of the suggested download filename.
    pub download_prefix: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            frame_interval_ms: 16,
            track_duration_secs: TRACK_DURATION_SECS,
            prime_window_secs: 0.1,
            max_text_chars: 180,
            idle_action: "Idle".to_owned(),
            recorder_timeslice_ms: 100,
            video_bits_per_second: 2_500_000,
            download_prefix: "avatar-animation".to_owned(),
        }
    }
}

impl AvatarConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> AvatarResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: &Path) -> AvatarResult<Self> {
        use anyhow::Context as _;
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> AvatarResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AvatarError::validation("tick_interval_ms must be > 0"));
        }
        if self.frame_interval_ms == 0 {
            return Err(AvatarError::validation("frame_interval_ms must be > 0"));
        }
        if self.recorder_timeslice_ms == 0 {
            return Err(AvatarError::validation("recorder_timeslice_ms must be > 0"));
        }
        if !self.track_duration_secs.is_finite() || self.track_duration_secs <= 0.0 {
            return Err(AvatarError::validation(
                "track_duration_secs must be a positive number",
            ));
        }
        if !self.prime_window_secs.is_finite() || self.prime_window_secs < 0.0 {
            return Err(AvatarError::validation(
                "prime_window_secs must be a non-negative number",
            ));
        }
        if self.max_text_chars == 0 {
            return Err(AvatarError::validation("max_text_chars must be > 0"));
        }
        if self.idle_action.trim().is_empty() {
            return Err(AvatarError::validation("idle_action must not be empty"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn recorder_timeslice(&self) -> Duration {
        Duration::from_millis(self.recorder_timeslice_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
