use crate::foundation::core::secs_to_ms;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::audio::AudioClock;
use crate::render::renderer::Renderer;
use crate::schedule::state::{PassCounter, PassToken};

/// One mouth-shape change reported by speech synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisemeEvent {
    pub viseme_id: u32,
    pub timestamp_ms: u64,
}

impl VisemeEvent {
    pub fn new(viseme_id: u32, timestamp_ms: u64) -> Self {
        Self {
            viseme_id,
            timestamp_ms,
        }
    }
}

/// Append-only, time-ordered viseme events of the current utterance.
///
/// A new synthesis replaces the whole queue; events of two utterances never mix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisemeQueue {
    events: Vec<VisemeEvent>,
}

impl VisemeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = VisemeEvent>) -> AvatarResult<Self> {
        let mut queue = Self::new();
        for event in events {
            queue.push(event)?;
        }
        Ok(queue)
    }

    /// Append an event. Timestamps must be non-decreasing.
    pub fn push(&mut self, event: VisemeEvent) -> AvatarResult<()> {
        if let Some(last) = self.events.last()
            && event.timestamp_ms < last.timestamp_ms
        {
            return Err(AvatarError::validation(format!(
                "viseme at {}ms arrived after one at {}ms",
                event.timestamp_ms, last.timestamp_ms
            )));
        }
        self.events.push(event);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[VisemeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Result of one frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Request another frame.
    Reschedule,
    /// Queue exhausted or audio paused; the loop stops.
    Done,
    /// Callback of a cancelled loop; ignored.
    Stale,
}

/// Frame-driven dispatcher of viseme events against the audio clock.
#[derive(Debug, Default)]
pub struct VisemeSynchronizer {
    events: Vec<VisemeEvent>,
    cursor: usize,
    passes: PassCounter,
    current: Option<PassToken>,
    dispatched: u64,
    failed: u64,
}

impl VisemeSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a loop over a snapshot of `queue`, cancelling any loop already running.
    pub fn start(&mut self, queue: &VisemeQueue) -> PassToken {
        self.cancel();
        self.events = queue.events().to_vec();
        self.cursor = 0;
        let token = self.passes.next();
        self.current = Some(token);
        tracing::debug!(events = self.events.len(), "viseme loop started");
        token
    }

    /// One frame: dispatch every event whose timestamp the audio has reached.
    pub fn on_frame(
        &mut self,
        token: PassToken,
        audio: &dyn AudioClock,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        if self.current != Some(token) {
            return FrameOutcome::Stale;
        }

        let elapsed_ms = secs_to_ms(audio.current_time());
        while let Some(event) = self.events.get(self.cursor).copied() {
            if event.timestamp_ms as f64 > elapsed_ms {
                break;
            }
            self.cursor += 1;
            match renderer.update_viseme(event.viseme_id) {
                Ok(()) => self.dispatched += 1,
                Err(err) => {
                    self.failed += 1;
                    tracing::warn!(
                        viseme = event.viseme_id,
                        at_ms = event.timestamp_ms,
                        error = %err,
                        "skipping failed viseme"
                    );
                }
            }
        }

        if self.cursor >= self.events.len() || audio.paused() {
            tracing::debug!(
                remaining = self.events.len() - self.cursor,
                "viseme loop finished"
            );
            self.current = None;
            return FrameOutcome::Done;
        }
        FrameOutcome::Reschedule
    }

    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("viseme loop cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_pass(&self) -> Option<PassToken> {
        self.current
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/viseme.rs"]
mod tests;
