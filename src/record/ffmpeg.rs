use std::collections::BTreeSet;
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{AvatarError, AvatarResult};
use crate::record::codec::CodecSupport;

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Codec support answered from the encoders compiled into the system `ffmpeg`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FfmpegCodecProbe {
    encoders: BTreeSet<String>,
}

impl FfmpegCodecProbe {
    pub fn from_encoders<I, S>(encoders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            encoders: encoders.into_iter().map(Into::into).collect(),
        }
    }

    /// Run `ffmpeg -hide_banner -encoders` and parse its listing.
    pub fn probe() -> AvatarResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(AvatarError::precondition("ffmpeg was not found on PATH"));
        }
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .context("failed to run ffmpeg -encoders")?;
        if !output.status.success() {
            return Err(AvatarError::precondition(format!(
                "ffmpeg -encoders exited with {}",
                output.status
            )));
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        let probe = Self::from_encoders(parse_encoder_list(&listing));
        tracing::debug!(encoders = probe.encoders.len(), "probed ffmpeg encoders");
        Ok(probe)
    }

    /// Probe, or an empty probe (nothing supported) when ffmpeg is unusable.
    pub fn probe_or_empty() -> Self {
        Self::probe().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ffmpeg probe failed; no codecs available");
            Self::default()
        })
    }

    pub fn has_encoder(&self, name: &str) -> bool {
        self.encoders.contains(name)
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_encoder(n))
    }

    fn codec_available(&self, codec: &str) -> bool {
        let codec = codec.trim().to_ascii_lowercase();
        if codec == "h264" || codec.starts_with("avc1") {
            self.has_any(&["libx264", "h264_nvenc", "h264_videotoolbox", "h264_vaapi"])
        } else if codec == "aac" || codec.starts_with("mp4a") {
            self.has_any(&["aac", "libfdk_aac"])
        } else if codec == "opus" {
            self.has_any(&["libopus", "opus"])
        } else if codec == "vp9" {
            self.has_encoder("libvpx-vp9")
        } else if codec == "vp8" {
            self.has_encoder("libvpx")
        } else {
            false
        }
    }
}

impl CodecSupport for FfmpegCodecProbe {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        let (container, codecs) = match mime_type.split_once(';') {
            Some((container, params)) => (container.trim(), params.trim()),
            None => (mime_type.trim(), ""),
        };
        if container != "video/mp4" && container != "video/webm" {
            return false;
        }
        match codecs.strip_prefix("codecs=") {
            Some(list) => list
                .trim_matches('"')
                .split(',')
                .all(|c| self.codec_available(c)),
            // A bare container needs some default video encoder for it.
            None if container == "video/webm" => self.has_any(&["libvpx", "libvpx-vp9"]),
            None => self.has_encoder("libx264"),
        }
    }
}

/// Encoder names from `ffmpeg -encoders` output.
///
/// Entries look like ` V....D libx264    libx264 H.264 ...`; the header above the `------` line is
/// skipped.
pub fn parse_encoder_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let flags = fields.next()?;
            let name = fields.next()?;
            (flags.len() == 6).then(|| name.to_owned())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/record/ffmpeg.rs"]
mod tests;
