use crate::foundation::error::{AvatarError, AvatarResult};

/// Voice used when a request does not name one.
pub const DEFAULT_VOICE: &str = "zh-CN-XiaoxiaoNeural";

/// Text (and optional SSML) the user asked the avatar to speak.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_owned()
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ssml: None,
            voice: default_voice(),
        }
    }

    pub fn with_ssml(mut self, ssml: impl Into<String>) -> Self {
        self.ssml = Some(ssml.into());
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Reject blank text, over-long text and a blank voice.
    pub fn validate(&self, max_chars: usize) -> AvatarResult<()> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(AvatarError::validation("text to speak must not be empty"));
        }
        let chars = text.chars().count();
        if chars > max_chars {
            return Err(AvatarError::validation(format!(
                "text is {chars} characters, limit is {max_chars}"
            )));
        }
        if self.voice.trim().is_empty() {
            return Err(AvatarError::validation("voice must not be empty"));
        }
        Ok(())
    }

    /// SSML wins over plain text when present.
    pub fn is_ssml(&self) -> bool {
        self.ssml.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// What gets sent to the synthesizer.
    pub fn content(&self) -> &str {
        match self.ssml.as_deref() {
            Some(ssml) if self.is_ssml() => ssml,
            _ => self.text.trim(),
        }
    }
}

/// Wrap `content` in the `<speak>` document a TTS backend expects.
///
/// SSML input loses its own `<speak>` wrapper, gets `pitch="0st"` normalized to `"+0st"` and is
/// put inside `<voice name=..>` unless it already names a voice, in which case that voice wins.
pub fn speak_envelope(content: &str, voice: &str, is_ssml: bool) -> String {
    if !is_ssml {
        return format!(
            r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xml:lang="zh-CN"><voice name="{voice}">{content}</voice></speak>"#
        );
    }

    let inner = strip_speak(content).replace(r#"pitch="0st""#, r#"pitch="+0st""#);
    let body = match embedded_voice(&inner) {
        Some(named) => {
            if let Some(named) = named.as_deref()
                && named != voice
            {
                tracing::warn!(requested = voice, embedded = named, "ssml names its own voice; using it");
            }
            inner
        }
        None => format!(r#"<voice name="{voice}">{inner}</voice>"#),
    };
    format!(
        r#"<speak version="1.0" xml:lang="zh-CN" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="http://www.w3.org/2001/mstts">{body}</speak>"#
    )
}

fn strip_speak(content: &str) -> String {
    let mut out = content.to_owned();
    if let Some(open) = out.find("<speak")
        && let Some(close) = out[open..].find('>')
    {
        out.replace_range(open..open + close + 1, "");
    }
    if let Some(end) = out.find("</speak>") {
        out.replace_range(end..end + "</speak>".len(), "");
    }
    out.trim().to_owned()
}

/// `Some(name)` when the SSML contains a `<voice>` element; the name is `None` if unreadable.
fn embedded_voice(ssml: &str) -> Option<Option<String>> {
    let lower = ssml.to_ascii_lowercase();
    let start = lower.match_indices("<voice").find_map(|(idx, tag)| {
        let next = lower[idx + tag.len()..].chars().next()?;
        (next == '>' || next.is_whitespace()).then_some(idx)
    })?;
    let tag_end = lower[start..].find('>').map_or(lower.len(), |e| start + e);
    let tag = &ssml[start..tag_end];
    let name = tag.find("name=").and_then(|at| {
        let rest = &tag[at + "name=".len()..];
        let quote = rest.chars().next().filter(|q| *q == '"' || *q == '\'')?;
        let rest = &rest[1..];
        rest.find(quote).map(|end| rest[..end].to_owned())
    });
    Some(name)
}

#[cfg(test)]
#[path = "../../tests/unit/speech/request.rs"]
mod tests;
