use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::stream::{MediaKind, MediaStream, MediaTrack};
use crate::render::renderer::Renderer;
use std::collections::BTreeSet;

/// One renderer invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RendererCall {
    PlayAnimation(String),
    UpdateEmotion(String),
    UpdateViseme(u32),
}

/// A call stamped with the audio time at which it was made.
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedCall {
    pub at_secs: f64,
    pub call: RendererCall,
}

/// Renderer that records every call instead of drawing.
///
/// Used by tests and the command line simulator. The owner advances the stamp with
/// [`CallLogRenderer::set_clock`] before pumping the schedulers.
#[derive(Debug, Default)]
pub struct CallLogRenderer {
    now_secs: f64,
    calls: Vec<LoggedCall>,
    failing: BTreeSet<String>,
    failing_visemes: BTreeSet<u32>,
    no_video: bool,
    captures: Vec<MediaTrack>,
}

impl CallLogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose capture has no video tracks.
    pub fn without_video() -> Self {
        Self {
            no_video: true,
            ..Self::default()
        }
    }

    /// Make calls with this animation/emotion name fail.
    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.failing.insert(name.into());
    }

    pub fn fail_on_viseme(&mut self, viseme_id: u32) {
        self.failing_visemes.insert(viseme_id);
    }

    pub fn set_clock(&mut self, secs: f64) {
        self.now_secs = secs;
    }

    pub fn logged(&self) -> &[LoggedCall] {
        &self.calls
    }

    pub fn calls(&self) -> Vec<RendererCall> {
        self.calls.iter().map(|c| c.call.clone()).collect()
    }

    pub fn take_calls(&mut self) -> Vec<LoggedCall> {
        std::mem::take(&mut self.calls)
    }

    /// Every video track handed out by [`Renderer::video_stream`].
    pub fn captures(&self) -> &[MediaTrack] {
        &self.captures
    }

    fn push(&mut self, call: RendererCall) {
        self.calls.push(LoggedCall {
            at_secs: self.now_secs,
            call,
        });
    }
}

impl Renderer for CallLogRenderer {
    fn play_animation(&mut self, name: &str) -> AvatarResult<()> {
        if self.failing.contains(name) {
            return Err(AvatarError::playback(format!("animation '{name}' failed")));
        }
        self.push(RendererCall::PlayAnimation(name.to_owned()));
        Ok(())
    }

    fn update_emotion(&mut self, name: &str) -> AvatarResult<()> {
        if self.failing.contains(name) {
            return Err(AvatarError::playback(format!("emotion '{name}' failed")));
        }
        self.push(RendererCall::UpdateEmotion(name.to_owned()));
        Ok(())
    }

    fn update_viseme(&mut self, viseme_id: u32) -> AvatarResult<()> {
        if self.failing_visemes.contains(&viseme_id) {
            return Err(AvatarError::playback(format!(
                "viseme {viseme_id} failed"
            )));
        }
        self.push(RendererCall::UpdateViseme(viseme_id));
        Ok(())
    }

    fn video_stream(&mut self) -> AvatarResult<MediaStream> {
        if self.no_video {
            return Ok(MediaStream::default());
        }
        let track = MediaTrack::new(MediaKind::Video, "avatar-canvas");
        self.captures.push(track.clone());
        Ok(MediaStream::new(vec![track]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/log.rs"]
mod tests;
