use crate::config::AvatarConfig;
use crate::foundation::core::TrackKind;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::audio::AudioClock;
use crate::render::renderer::{Renderer, apply_track_value};
use crate::schedule::state::{AnimationRuntimeState, PassCounter, PassToken, SchedulerPhase};
use crate::timeline::keyframe::Keyframe;
use crate::timeline::model::Timeline;

/// Result of one scheduler tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still scheduled; arm the next tick.
    Pending,
    /// Audio ended; the pass is over and the avatar is back to idle.
    Finished,
    /// The tick belongs to a cancelled pass and was ignored.
    Stale,
}

/// Sorted keyframes of one track with a monotonic cursor.
#[derive(Debug, Default)]
struct TrackCursor {
    frames: Vec<Keyframe>,
    next: usize,
}

impl TrackCursor {
    fn planned(timeline: &Timeline, track: TrackKind) -> Self {
        Self {
            frames: timeline.sorted(track),
            next: 0,
        }
    }

    fn peek_due(&self, now: f64) -> Option<&Keyframe> {
        self.frames.get(self.next).filter(|k| k.time <= now)
    }

    fn remaining(&self) -> usize {
        self.frames.len() - self.next
    }
}

/// Translates audio playback time into pose/emotion transitions.
///
/// Each track keeps a cursor into its time-sorted keyframes. A tick drains every keyframe whose
/// time has passed, merging both tracks by time, so a late tick still applies every transition
/// exactly once and in order.
/// Cursors never move backwards within a pass.
#[derive(Debug)]
pub struct AnimationScheduler {
    idle_action: String,
    prime_window_secs: f64,
    phase: SchedulerPhase,
    passes: PassCounter,
    current: Option<PassToken>,
    actions: TrackCursor,
    emotions: TrackCursor,
    state: AnimationRuntimeState,
    failed_transitions: u64,
}

impl AnimationScheduler {
    pub fn new(cfg: &AvatarConfig) -> Self {
        Self {
            idle_action: cfg.idle_action.clone(),
            prime_window_secs: cfg.prime_window_secs,
            phase: SchedulerPhase::Idle,
            passes: PassCounter::default(),
            current: None,
            actions: TrackCursor::default(),
            emotions: TrackCursor::default(),
            state: AnimationRuntimeState::idle(&cfg.idle_action),
            failed_transitions: 0,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn is_scheduled(&self) -> bool {
        self.phase == SchedulerPhase::Scheduled
    }

    pub fn state(&self) -> &AnimationRuntimeState {
        &self.state
    }

    pub fn current_pass(&self) -> Option<PassToken> {
        self.current
    }

    /// Keyframes not yet applied in the current pass, per track.
    pub fn pending(&self) -> (usize, usize) {
        (self.actions.remaining(), self.emotions.remaining())
    }

    /// Number of renderer calls that failed and were skipped since construction.
    pub fn failed_transitions(&self) -> u64 {
        self.failed_transitions
    }

    fn cursor(&self, track: TrackKind) -> &TrackCursor {
        match track {
            TrackKind::Action => &self.actions,
            TrackKind::Emotion => &self.emotions,
        }
    }

    /// Earliest due keyframe across both tracks; ties go to the action track.
    fn next_due(&self, now: f64) -> Option<(TrackKind, f64, String)> {
        TrackKind::ALL
            .into_iter()
            .filter_map(|track| {
                self.cursor(track)
                    .peek_due(now)
                    .map(|k| (track, k.time, k.value.clone()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn cursor_mut(&mut self, track: TrackKind) -> &mut TrackCursor {
        match track {
            TrackKind::Action => &mut self.actions,
            TrackKind::Emotion => &mut self.emotions,
        }
    }

    /// Begin a pass over a snapshot of `timeline`, cancelling any pass already running.
    ///
    /// The initial pose is shown immediately from the first keyframe of each track. When that
    /// keyframe lies inside the priming window the cursor starts after it; otherwise it stays put
    /// and the tick that reaches it sees an unchanged value. An empty action track shows idle.
    pub fn start(&mut self, timeline: &Timeline, renderer: &mut dyn Renderer) -> PassToken {
        if self.is_scheduled() {
            tracing::debug!("cancelling previous animation pass");
            self.cancel();
        }

        self.actions = TrackCursor::planned(timeline, TrackKind::Action);
        self.emotions = TrackCursor::planned(timeline, TrackKind::Emotion);
        self.state = AnimationRuntimeState::idle(&self.idle_action);
        self.state.is_playing = true;

        let token = self.passes.next();
        self.current = Some(token);
        self.phase = SchedulerPhase::Scheduled;

        let mut initial_action = self.idle_action.clone();
        let mut initial_emotion = String::new();
        let window = self.prime_window_secs;
        for track in TrackKind::ALL {
            let cursor = self.cursor_mut(track);
            let Some(first) = cursor.frames.first() else {
                continue;
            };
            let value = first.value.clone();
            // Only a keyframe inside the window is consumed; a later one still fires on its tick.
            if first.time <= window {
                cursor.next = 1;
            }
            match track {
                TrackKind::Action => initial_action = value,
                TrackKind::Emotion => initial_emotion = value,
            }
        }

        tracing::info!(
            action = %initial_action,
            emotion = %initial_emotion,
            action_keyframes = self.actions.frames.len(),
            emotion_keyframes = self.emotions.frames.len(),
            "animation pass started"
        );
        self.apply(renderer, TrackKind::Action, &initial_action, true);
        if !initial_emotion.is_empty() {
            self.apply(renderer, TrackKind::Emotion, &initial_emotion, true);
        }
        token
    }

    /// One timer tick: apply every keyframe due at the audio's current time.
    pub fn tick(
        &mut self,
        token: PassToken,
        audio: &dyn AudioClock,
        renderer: &mut dyn Renderer,
    ) -> TickOutcome {
        if self.current != Some(token) {
            return TickOutcome::Stale;
        }

        let now = audio.current_time();
        while let Some((track, at, value)) = self.next_due(now) {
            self.cursor_mut(track).next += 1;
            if value != self.state.value(track) {
                tracing::debug!(%track, at, now, value = %value, "keyframe triggered");
                self.apply(renderer, track, &value, false);
            }
        }

        if audio.ended() {
            tracing::info!(now, "audio ended, animation pass finished");
            self.finish(renderer);
            return TickOutcome::Finished;
        }
        TickOutcome::Pending
    }

    /// Stop the running pass and return the avatar to idle. Idempotent: with no pass running this
    /// does nothing at all.
    pub fn stop(&mut self, renderer: &mut dyn Renderer) {
        if !self.is_scheduled() {
            return;
        }
        tracing::info!("animation pass stopped");
        self.finish(renderer);
    }

    /// Cancel any pass and unconditionally drive the renderer to idle and neutral.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        self.finish(renderer);
    }

    /// Replan the running pass from an edited `timeline` without replaying or skipping.
    ///
    /// Cursors are placed after every keyframe with `time <= now`; the latest of those becomes
    /// the visible value of its track (or idle/neutral when none is due yet).
    pub fn resync(
        &mut self,
        timeline: &Timeline,
        now: f64,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<()> {
        if !self.is_scheduled() {
            return Err(AvatarError::precondition(
                "resync requires a running animation pass",
            ));
        }
        for track in TrackKind::ALL {
            let mut cursor = TrackCursor::planned(timeline, track);
            cursor.next = cursor.frames.partition_point(|k| k.time <= now);
            let target = match cursor.next.checked_sub(1) {
                Some(last) => cursor.frames[last].value.clone(),
                None => match track {
                    TrackKind::Action => self.idle_action.clone(),
                    TrackKind::Emotion => String::new(),
                },
            };
            *self.cursor_mut(track) = cursor;
            if target != self.state.value(track) {
                self.apply(renderer, track, &target, false);
            }
        }
        tracing::debug!(now, "animation pass resynced");
        Ok(())
    }

    fn cancel(&mut self) {
        self.current = None;
        self.phase = SchedulerPhase::Idle;
        self.actions = TrackCursor::default();
        self.emotions = TrackCursor::default();
    }

    fn finish(&mut self, renderer: &mut dyn Renderer) {
        self.cancel();
        self.state = AnimationRuntimeState::idle(&self.idle_action);
        let idle = self.idle_action.clone();
        self.apply(renderer, TrackKind::Action, &idle, true);
        self.apply(renderer, TrackKind::Emotion, "", true);
    }

    /// Drive the renderer; on failure the transition is skipped and state keeps its old value.
    fn apply(&mut self, renderer: &mut dyn Renderer, track: TrackKind, value: &str, force: bool) {
        if !force && value == self.state.value(track) {
            return;
        }
        match apply_track_value(renderer, track, value) {
            Ok(()) => self.state.set(track, value),
            Err(err) => {
                self.failed_transitions += 1;
                tracing::warn!(%track, value, error = %err, "skipping failed transition");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/animation.rs"]
mod tests;
