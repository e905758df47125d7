use crate::foundation::error::AvatarResult;
use crate::media::blob::Blob;
use crate::schedule::viseme::VisemeEvent;

/// Playable audio returned by a synthesizer.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesizedAudio {
    pub audio: Blob,
    /// Length of the clip as the audio element will report it.
    pub duration_secs: f64,
}

/// Text-to-speech collaborator.
///
/// `on_viseme` is invoked once per mouth-shape event, in timestamp order, before the call returns.
pub trait SpeechSynthesizer {
    fn synthesize(
        &mut self,
        content: &str,
        voice: &str,
        is_ssml: bool,
        on_viseme: Option<&mut dyn FnMut(VisemeEvent)>,
    ) -> AvatarResult<SynthesizedAudio>;
}
