/// One container/codec pair the recorder may be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecCandidate {
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Formats probed in order; the first supported one wins.
pub const CODEC_PREFERENCE: [CodecCandidate; 5] = [
    CodecCandidate {
        mime_type: "video/mp4;codecs=h264,aac",
        extension: "mp4",
    },
    CodecCandidate {
        mime_type: "video/mp4;codecs=avc1.42E01E,mp4a.40.2",
        extension: "mp4",
    },
    CodecCandidate {
        mime_type: "video/webm;codecs=h264,opus",
        extension: "webm",
    },
    CodecCandidate {
        mime_type: "video/webm;codecs=vp9,opus",
        extension: "webm",
    },
    CodecCandidate {
        mime_type: "video/webm",
        extension: "webm",
    },
];

/// Answers `MediaRecorder.isTypeSupported`-style questions.
pub trait CodecSupport {
    fn is_type_supported(&self, mime_type: &str) -> bool;
}

/// Encoding chosen for a recording.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct NegotiatedFormat {
    pub mime_type: String,
    /// File extension used for the download name.
    pub extension: String,
}

impl NegotiatedFormat {
    fn from_candidate(candidate: &CodecCandidate) -> Self {
        Self {
            mime_type: candidate.mime_type.to_owned(),
            extension: candidate.extension.to_owned(),
        }
    }

    /// Container part of the MIME type, e.g. `video/mp4`.
    pub fn container(&self) -> &str {
        self.mime_type
            .split_once(';')
            .map_or(self.mime_type.as_str(), |(container, _)| container)
    }
}

/// Pick the most preferred supported format. Never fails: with nothing supported the bare WebM
/// entry is returned and the recorder is left to cope.
pub fn negotiate_format(support: &dyn CodecSupport) -> NegotiatedFormat {
    let fallback = &CODEC_PREFERENCE[CODEC_PREFERENCE.len() - 1];
    let chosen = CODEC_PREFERENCE
        .iter()
        .find(|c| support.is_type_supported(c.mime_type))
        .unwrap_or_else(|| {
            tracing::warn!(
                mime_type = fallback.mime_type,
                "no probed format is supported; using fallback"
            );
            fallback
        });
    tracing::info!(
        mime_type = chosen.mime_type,
        extension = chosen.extension,
        "negotiated recording format"
    );
    NegotiatedFormat::from_candidate(chosen)
}

#[cfg(test)]
#[path = "../../tests/unit/record/codec.rs"]
mod tests;
