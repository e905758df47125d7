/// Convenience result type used across avatar-sync.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Top-level error taxonomy used by the timeline, schedulers and recording pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// Invalid user-provided data (text, keyframe values, ids, viseme order).
    #[error("validation error: {0}")]
    Validation(String),

    /// A required collaborator or resource is missing for the requested operation.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Audio load/play failures and renderer call failures.
    #[error("playback error: {0}")]
    Playback(String),

    /// Recorder construction, start/stop or runtime error events.
    #[error("recording error: {0}")]
    Recording(String),

    /// Speech synthesis collaborator failures.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build an [`AvatarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AvatarError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build an [`AvatarError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build an [`AvatarError::Recording`] value.
    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording(msg.into())
    }

    /// Build an [`AvatarError::Synthesis`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build an [`AvatarError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short message suitable for showing to an end user.
    ///
    /// The full `Display` output carries diagnostic detail and belongs in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid input",
            Self::Precondition(_) => "not ready: avatar or audio unavailable",
            Self::Playback(_) => "playback failed",
            Self::Recording(_) => "recording failed",
            Self::Synthesis(_) => "synthesis failed",
            Self::Serde(_) => "invalid data format",
            Self::Other(_) => "unexpected error",
        }
    }
}

impl From<serde_json::Error> for AvatarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
