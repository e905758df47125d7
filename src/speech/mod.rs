//! Speech synthesis seam. The cloud TTS proxy lives outside this crate; sessions only see the
//! [`SpeechSynthesizer`] trait.

pub mod request;
pub mod scripted;
pub mod synth;

pub use request::{DEFAULT_VOICE, SynthesisRequest, speak_envelope};
pub use scripted::{ScriptedSynthesizer, SynthesisCall};
pub use synth::{SpeechSynthesizer, SynthesizedAudio};
