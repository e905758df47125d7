//! avatar-sync drives a speaking 3D avatar from synthesized audio.
//!
//! The crate turns a keyframe timeline and a viseme stream into renderer calls that stay in step
//! with an audio clock, and can capture one playback pass into a downloadable video:
//!
//! - Author keyframes on a [`Timeline`]
//! - Synthesize speech and play it through an [`AvatarSession`]
//! - Optionally record the pass with the [`RecordingPipeline`] and download the result
//!
//! Rendering, audio output and encoding are platform collaborators behind traits
//! ([`Renderer`], [`AudioElement`], [`MediaBackend`], [`SpeechSynthesizer`]); in-memory
//! implementations are provided for simulation and tests.
#![forbid(unsafe_code)]

pub mod config;
pub mod foundation;
pub mod media;
pub mod record;
pub mod registry;
pub mod render;
pub mod schedule;
pub mod session;
pub mod speech;
pub mod timeline;

pub use crate::config::AvatarConfig;
pub use crate::foundation::core::{ElementId, KeyframeId, TRACK_DURATION_SECS, TrackKind};
pub use crate::foundation::error::{AvatarError, AvatarResult};

pub use crate::media::{AudioClock, AudioElement, Blob, MediaStream, SimulatedAudio};
pub use crate::record::{
    DownloadArtifact, FfmpegCodecProbe, InMemoryMediaBackend, MediaBackend, NegotiatedFormat,
    RecordingPipeline, negotiate_format,
};
pub use crate::registry::{AnimationSet, ModelCatalog, builtin_animation_set};
pub use crate::render::{CallLogRenderer, Renderer, RendererCall};
pub use crate::schedule::{
    AnimationRuntimeState, AnimationScheduler, VisemeEvent, VisemeQueue, VisemeSynchronizer,
};
pub use crate::session::AvatarSession;
pub use crate::speech::{ScriptedSynthesizer, SpeechSynthesizer, SynthesisRequest};
pub use crate::timeline::{Keyframe, KeyframePatch, Timeline};
