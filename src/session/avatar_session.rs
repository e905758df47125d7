use std::time::Duration;

use crate::config::AvatarConfig;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::audio::{AudioClock, AudioElement, SimulatedAudio};
use crate::media::blob::ObjectUrlRegistry;
use crate::record::backend::MediaBackend;
use crate::record::codec::NegotiatedFormat;
use crate::record::pipeline::RecordingPipeline;
use crate::registry::set::AnimationSet;
use crate::render::log::CallLogRenderer;
use crate::render::renderer::Renderer;
use crate::schedule::animation::{AnimationScheduler, TickOutcome};
use crate::schedule::state::{AnimationRuntimeState, PassToken};
use crate::schedule::viseme::{FrameOutcome, VisemeEvent, VisemeQueue, VisemeSynchronizer};
use crate::session::event_loop::{EventLoop, LoopSource};
use crate::speech::request::SynthesisRequest;
use crate::speech::synth::SpeechSynthesizer;
use crate::timeline::model::Timeline;

/// Owns one avatar's timeline, schedulers, viseme queue and recording pipeline, and drives them
/// from a single cooperative loop.
///
/// The renderer and audio element are borrowed per call; the session never keeps them.
pub struct AvatarSession<B: MediaBackend> {
    config: AvatarConfig,
    registry: AnimationSet,
    timeline: Timeline,
    scheduler: AnimationScheduler,
    visemes: VisemeQueue,
    sync: VisemeSynchronizer,
    recording: RecordingPipeline<B>,
    event_loop: EventLoop,
    animation_pass: Option<PassToken>,
    viseme_pass: Option<PassToken>,
    audio_urls: ObjectUrlRegistry,
    audio_url: Option<String>,
}

impl<B: MediaBackend> std::fmt::Debug for AvatarSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarSession")
            .field("runtime", self.scheduler.state())
            .field("keyframes", &self.timeline.len())
            .field("visemes", &self.visemes.len())
            .field("recording", &self.recording)
            .field("audio_url", &self.audio_url)
            .finish()
    }
}

impl<B: MediaBackend> AvatarSession<B> {
    pub fn new(config: AvatarConfig, registry: AnimationSet, backend: B) -> AvatarResult<Self> {
        config.validate()?;
        registry.validate()?;
        let timeline = Timeline::new(config.track_duration_secs)
            .with_idle_action(config.idle_action.clone());
        Ok(Self {
            scheduler: AnimationScheduler::new(&config),
            recording: RecordingPipeline::new(&config, backend),
            config,
            registry,
            timeline,
            visemes: VisemeQueue::new(),
            sync: VisemeSynchronizer::new(),
            event_loop: EventLoop::new(),
            animation_pass: None,
            viseme_pass: None,
            audio_urls: ObjectUrlRegistry::new("audio"),
            audio_url: None,
        })
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    pub fn registry(&self) -> &AnimationSet {
        &self.registry
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Editing a running pass has no effect until [`AvatarSession::resync`].
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Replace the timeline, e.g. after an import. Checked against the current registry.
    pub fn set_timeline(&mut self, timeline: Timeline) -> AvatarResult<()> {
        timeline.revalidate(&self.registry)?;
        self.timeline = timeline;
        Ok(())
    }

    pub fn runtime_state(&self) -> &AnimationRuntimeState {
        self.scheduler.state()
    }

    pub fn visemes(&self) -> &VisemeQueue {
        &self.visemes
    }

    pub fn recording(&self) -> &RecordingPipeline<B> {
        &self.recording
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    /// Whether any timer, frame loop or recording is still live.
    pub fn is_active(&self) -> bool {
        self.animation_pass.is_some() || self.viseme_pass.is_some() || self.recording.is_recording()
    }

    /// Synthesize `request`, bind the clip to `audio` and play it with the timeline and visemes.
    #[tracing::instrument(skip_all, fields(chars = request.text.chars().count(), ssml = request.is_ssml()))]
    pub fn animate(
        &mut self,
        request: &SynthesisRequest,
        synth: &mut dyn SpeechSynthesizer,
        audio: &mut dyn AudioElement,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<()> {
        request.validate(self.config.max_text_chars)?;

        self.halt_schedulers();
        audio.pause();
        audio.set_current_time(0.0);
        self.scheduler.reset(renderer);
        self.visemes.clear();

        let mut queue = VisemeQueue::new();
        let mut rejected = None;
        let mut on_viseme = |event: VisemeEvent| {
            if let Err(err) = queue.push(event)
                && rejected.is_none()
            {
                rejected = Some(err);
            }
        };
        let synthesized = synth.synthesize(
            request.content(),
            &request.voice,
            request.is_ssml(),
            Some(&mut on_viseme),
        )?;
        if let Some(err) = rejected {
            return Err(err);
        }
        self.visemes = queue;
        tracing::info!(
            duration = synthesized.duration_secs,
            visemes = self.visemes.len(),
            "speech synthesized"
        );

        self.revoke_audio_url();
        let url = self.audio_urls.create(synthesized.audio);
        self.audio_url = Some(url.clone());
        audio.load(&url, synthesized.duration_secs)?;
        audio.set_current_time(0.0);
        audio.play()?;

        self.start_schedulers(renderer);
        Ok(())
    }

    /// Record one pass of the current audio with the timeline and visemes replayed in sync.
    #[tracing::instrument(skip_all)]
    pub fn record(
        &mut self,
        audio: &mut dyn AudioElement,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<NegotiatedFormat> {
        self.halt_schedulers();
        let format = match self.recording.start(Some(&mut *renderer), Some(audio)) {
            Ok(format) => format,
            Err(err) => {
                self.scheduler.reset(renderer);
                return Err(err);
            }
        };
        self.start_schedulers(renderer);
        Ok(format)
    }

    /// Apply timeline edits to the running pass at the audio's current position.
    pub fn resync(&mut self, audio: &dyn AudioClock, renderer: &mut dyn Renderer) -> AvatarResult<()> {
        self.scheduler
            .resync(&self.timeline, audio.current_time(), renderer)
    }

    /// Advance the loop clock by `dt` and run everything that became due.
    ///
    /// The caller advances the audio itself; this only reads it. Recorder chunks are collected
    /// afterwards and the audio `ended` event is forwarded to the recording pipeline.
    pub fn pump(
        &mut self,
        dt: Duration,
        audio: &dyn AudioClock,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<()> {
        self.event_loop.advance(dt);
        while let Some(source) = self.event_loop.pop_due() {
            match source {
                LoopSource::AnimationTick => self.on_tick(audio, renderer),
                LoopSource::Frame => self.on_frame(audio, renderer),
            }
        }

        if let Err(err) = self.recording.poll() {
            tracing::error!(error = %err, "recording aborted");
            self.halt_schedulers();
            self.scheduler.reset(renderer);
            return Err(err);
        }
        if audio.ended() {
            self.recording.on_audio_ended();
        }
        Ok(())
    }

    /// Play a simulated clip to the end in frame-sized steps.
    ///
    /// Stops early if the audio stalls (paused without ending); the loop never waits on a timeout.
    pub fn run_to_end(
        &mut self,
        audio: &mut SimulatedAudio,
        renderer: &mut CallLogRenderer,
    ) -> AvatarResult<()> {
        let step = self.config.frame_interval();
        while self.is_active() {
            if audio.paused() && !audio.ended() {
                tracing::warn!(at = audio.current_time(), "audio stalled; leaving run loop");
                break;
            }
            audio.advance(step.as_secs_f64());
            renderer.set_clock(audio.current_time());
            self.pump(step, audio, renderer)?;
        }
        Ok(())
    }

    /// Stop playback, schedulers and recording. Idempotent.
    pub fn stop(&mut self, audio: &mut dyn AudioElement, renderer: &mut dyn Renderer) {
        audio.pause();
        self.halt_schedulers();
        self.scheduler.stop(renderer);
        self.recording.stop();
    }

    /// Full teardown: stop everything, release the recording pipeline and the audio URL.
    pub fn reset(&mut self, audio: &mut dyn AudioElement, renderer: &mut dyn Renderer) {
        self.stop(audio, renderer);
        self.recording.reset();
        self.revoke_audio_url();
        self.visemes.clear();
        tracing::info!("session reset");
    }

    /// Switch to another model's animation set. The timeline must stay valid under it.
    pub fn switch_registry(
        &mut self,
        registry: AnimationSet,
        audio: &mut dyn AudioElement,
        renderer: &mut dyn Renderer,
    ) -> AvatarResult<()> {
        registry.validate()?;
        self.timeline.revalidate(&registry).map_err(|err| {
            AvatarError::validation(format!("timeline does not fit the new model: {err}"))
        })?;
        self.stop(audio, renderer);
        self.registry = registry;
        Ok(())
    }

    fn start_schedulers(&mut self, renderer: &mut dyn Renderer) {
        self.animation_pass = Some(self.scheduler.start(&self.timeline, renderer));
        self.viseme_pass = Some(self.sync.start(&self.visemes));
        self.event_loop
            .schedule(LoopSource::AnimationTick, self.config.tick_interval());
        self.event_loop.schedule(LoopSource::Frame, Duration::ZERO);
    }

    fn halt_schedulers(&mut self) {
        self.event_loop.clear();
        self.animation_pass = None;
        self.viseme_pass = None;
        self.sync.cancel();
    }

    fn on_tick(&mut self, audio: &dyn AudioClock, renderer: &mut dyn Renderer) {
        let Some(token) = self.animation_pass else {
            return;
        };
        match self.scheduler.tick(token, audio, renderer) {
            TickOutcome::Pending => self
                .event_loop
                .schedule(LoopSource::AnimationTick, self.config.tick_interval()),
            TickOutcome::Finished | TickOutcome::Stale => self.animation_pass = None,
        }
    }

    fn on_frame(&mut self, audio: &dyn AudioClock, renderer: &mut dyn Renderer) {
        let Some(token) = self.viseme_pass else {
            return;
        };
        match self.sync.on_frame(token, audio, renderer) {
            FrameOutcome::Reschedule => self
                .event_loop
                .schedule(LoopSource::Frame, self.config.frame_interval()),
            FrameOutcome::Done | FrameOutcome::Stale => self.viseme_pass = None,
        }
    }

    fn revoke_audio_url(&mut self) {
        if let Some(url) = self.audio_url.take()
            && self.audio_urls.revoke(&url)
        {
            tracing::debug!(%url, "revoked audio url");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/avatar_session.rs"]
mod tests;
