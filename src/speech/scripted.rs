use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::blob::Blob;
use crate::schedule::viseme::VisemeEvent;
use crate::speech::request::speak_envelope;
use crate::speech::synth::{SpeechSynthesizer, SynthesizedAudio};

const SAMPLE_RATE: u32 = 8_000;
/// Longest silence actually encoded; longer clips keep their reported duration.
const MAX_SILENCE_SECS: f64 = 600.0;

/// One request seen by [`ScriptedSynthesizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisCall {
    pub voice: String,
    pub is_ssml: bool,
    /// The `<speak>` document that would have been sent.
    pub document: String,
}

/// Synthesizer that returns silence of a fixed length and replays a fixed viseme script.
#[derive(Clone, Debug)]
pub struct ScriptedSynthesizer {
    duration_secs: f64,
    visemes: Vec<VisemeEvent>,
    failure: Option<String>,
    calls: Vec<SynthesisCall>,
}

impl ScriptedSynthesizer {
    pub fn new(duration_secs: f64, visemes: Vec<VisemeEvent>) -> Self {
        Self {
            duration_secs,
            visemes,
            failure: None,
            calls: Vec::new(),
        }
    }

    /// Every later call fails with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> &[SynthesisCall] {
        &self.calls
    }
}

impl SpeechSynthesizer for ScriptedSynthesizer {
    fn synthesize(
        &mut self,
        content: &str,
        voice: &str,
        is_ssml: bool,
        on_viseme: Option<&mut dyn FnMut(VisemeEvent)>,
    ) -> AvatarResult<SynthesizedAudio> {
        self.calls.push(SynthesisCall {
            voice: voice.to_owned(),
            is_ssml,
            document: speak_envelope(content, voice, is_ssml),
        });
        if let Some(message) = &self.failure {
            return Err(AvatarError::synthesis(message.clone()));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(AvatarError::synthesis("scripted clip has no duration"));
        }

        if let Some(emit) = on_viseme {
            for event in &self.visemes {
                emit(*event);
            }
        }
        tracing::debug!(
            voice,
            is_ssml,
            duration = self.duration_secs,
            visemes = self.visemes.len(),
            "scripted synthesis"
        );
        Ok(SynthesizedAudio {
            audio: Blob::new("audio/wav", silent_wav(self.duration_secs)),
            duration_secs: self.duration_secs,
        })
    }
}

/// 8 kHz mono 8-bit PCM silence.
fn silent_wav(duration_secs: f64) -> Vec<u8> {
    let samples = (duration_secs.min(MAX_SILENCE_SECS) * f64::from(SAMPLE_RATE)).round() as u32;
    let mut out = Vec::with_capacity(44 + samples as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + samples).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&samples.to_le_bytes());
    out.resize(44 + samples as usize, 0x80);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/speech/scripted.rs"]
mod tests;
