use crate::foundation::core::TrackKind;

/// Visible pose/emotion the schedulers last drove the renderer to.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationRuntimeState {
    pub current_action: String,
    /// Empty string means neutral.
    pub current_emotion: String,
    pub is_playing: bool,
}

impl AnimationRuntimeState {
    pub fn idle(idle_action: &str) -> Self {
        Self {
            current_action: idle_action.to_owned(),
            current_emotion: String::new(),
            is_playing: false,
        }
    }

    pub fn value(&self, track: TrackKind) -> &str {
        match track {
            TrackKind::Action => &self.current_action,
            TrackKind::Emotion => &self.current_emotion,
        }
    }

    pub(crate) fn set(&mut self, track: TrackKind, value: &str) {
        let slot = match track {
            TrackKind::Action => &mut self.current_action,
            TrackKind::Emotion => &mut self.current_emotion,
        };
        value.clone_into(slot);
    }
}

/// Scheduler lifecycle: `Idle -> Scheduled -> Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Scheduled,
}

/// Identifies one scheduling pass.
///
/// Timer/frame callbacks carry the token of the pass that armed them; a callback whose token is
/// no longer current belongs to a cancelled pass and must not touch state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PassToken(u64);

#[derive(Debug, Default)]
pub(crate) struct PassCounter(u64);

impl PassCounter {
    pub(crate) fn next(&mut self) -> PassToken {
        self.0 += 1;
        PassToken(self.0)
    }
}
