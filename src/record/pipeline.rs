use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::AvatarConfig;
use crate::foundation::core::ElementId;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::audio::AudioElement;
use crate::media::blob::{Blob, ObjectUrlRegistry};
use crate::media::stream::MediaStream;
use crate::record::backend::{MediaBackend, MediaRecorder, RecorderOptions, RecorderState};
use crate::record::codec::{NegotiatedFormat, negotiate_format};
use crate::record::graph::AudioGraphSlot;
use crate::render::renderer::Renderer;

/// A finished take, exposed through an object URL.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedVideo {
    pub url: String,
    pub blob: Blob,
    pub format: NegotiatedFormat,
}

/// What a "download" hands to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub url: String,
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// Write the video into `dir` under its suggested filename.
    pub fn save_into(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}

/// Snapshot of the pipeline for diagnostics and UI state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RecordingStatus {
    pub is_recording: bool,
    pub recorder_state: Option<RecorderState>,
    pub chunks: usize,
    pub has_result: bool,
    pub format: Option<NegotiatedFormat>,
    pub graph_element: Option<ElementId>,
}

struct ActiveRecording {
    recorder: Box<dyn MediaRecorder>,
    format: NegotiatedFormat,
    chunks: Vec<Blob>,
    stop_on_audio_end: bool,
}

impl ActiveRecording {
    fn collect(&mut self) {
        self.chunks
            .extend(self.recorder.take_data().into_iter().filter(|c| !c.is_empty()));
    }
}

/// Captures the renderer's video and the playing audio into one encoded file.
///
/// One recording at a time. `stop` finalizes the take and keeps the audio graph warm for the next
/// one; `reset` releases everything, including the graph.
pub struct RecordingPipeline<B: MediaBackend> {
    backend: B,
    timeslice: Duration,
    video_bits_per_second: u32,
    download_prefix: String,
    graph: AudioGraphSlot,
    active: Option<ActiveRecording>,
    result: Option<RecordedVideo>,
    urls: ObjectUrlRegistry,
}

impl<B: MediaBackend> std::fmt::Debug for RecordingPipeline<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingPipeline")
            .field("status", &self.status())
            .finish()
    }
}

impl<B: MediaBackend> RecordingPipeline<B> {
    pub fn new(cfg: &AvatarConfig, backend: B) -> Self {
        Self {
            backend,
            timeslice: cfg.recorder_timeslice(),
            video_bits_per_second: cfg.video_bits_per_second,
            download_prefix: cfg.download_prefix.clone(),
            graph: AudioGraphSlot::new(),
            active: None,
            result: None,
            urls: ObjectUrlRegistry::new("recording"),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn result(&self) -> Option<&RecordedVideo> {
        self.result.as_ref()
    }

    /// Number of object URLs currently alive.
    pub fn live_urls(&self) -> usize {
        self.urls.live_count()
    }

    pub fn status(&self) -> RecordingStatus {
        RecordingStatus {
            is_recording: self.is_recording(),
            recorder_state: self.active.as_ref().map(|a| a.recorder.state()),
            chunks: self.active.as_ref().map_or(0, |a| a.chunks.len()),
            has_result: self.result.is_some(),
            format: self
                .active
                .as_ref()
                .map(|a| a.format.clone())
                .or_else(|| self.result.as_ref().map(|r| r.format.clone())),
            graph_element: self.graph.bound_element(),
        }
    }

    /// Start recording the renderer's output and `audio`, then play the audio from the top.
    ///
    /// A recording already in progress is stopped first. Any failure tears down what was created
    /// for this attempt.
    #[tracing::instrument(skip_all)]
    pub fn start(
        &mut self,
        renderer: Option<&mut dyn Renderer>,
        audio: Option<&mut dyn AudioElement>,
    ) -> AvatarResult<NegotiatedFormat> {
        let renderer =
            renderer.ok_or_else(|| AvatarError::precondition("renderer is not available"))?;
        let audio = audio.ok_or_else(|| AvatarError::precondition("audio element not found"))?;
        if audio.source().is_none_or(str::is_empty) {
            return Err(AvatarError::precondition("audio is not available"));
        }

        if self.active.is_some() {
            tracing::warn!("already recording, stopping first");
            self.stop();
        }
        self.discard_result();

        if !self.backend.recorder_supported() {
            return Err(AvatarError::precondition(
                "media recording is not supported by this backend",
            ));
        }

        let capture = renderer.video_stream()?;
        let video = MediaStream::new(capture.video_tracks().cloned().collect());
        if video.is_empty() {
            capture.stop_all();
            return Err(AvatarError::precondition(
                "renderer video stream has no video track",
            ));
        }
        tracing::debug!(video_tracks = video.tracks().len(), "video stream obtained");

        let destination = match self
            .graph
            .acquire(&mut self.backend, audio.id())
            .and_then(|graph| graph.create_recording_destination())
        {
            Ok(stream) => stream,
            Err(err) => {
                capture.stop_all();
                return Err(err);
            }
        };

        let combined = MediaStream::combine(&video, &destination);
        let format = negotiate_format(&self.backend);
        let options = RecorderOptions {
            mime_type: format.mime_type.clone(),
            video_bits_per_second: self.video_bits_per_second,
        };

        let mut recorder = match self.backend.create_recorder(combined.clone(), &options) {
            Ok(recorder) => recorder,
            Err(err) => {
                combined.stop_all();
                return Err(err);
            }
        };
        if let Err(err) = recorder.start(self.timeslice) {
            combined.stop_all();
            return Err(err);
        }

        audio.set_current_time(0.0);
        if let Err(err) = audio.play() {
            tracing::error!(error = %err, "audio refused to play, aborting recording");
            if let Err(stop_err) = recorder.stop() {
                tracing::warn!(error = %stop_err, "recorder stop failed during teardown");
            }
            combined.stop_all();
            return Err(err);
        }

        tracing::info!(
            mime_type = %format.mime_type,
            tracks = combined.tracks().len(),
            timeslice_ms = self.timeslice.as_millis() as u64,
            "recording started"
        );
        self.active = Some(ActiveRecording {
            recorder,
            format: format.clone(),
            chunks: Vec::new(),
            stop_on_audio_end: true,
        });
        Ok(format)
    }

    /// Collect chunks delivered since the last poll. A recorder error aborts the take.
    pub fn poll(&mut self) -> AvatarResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if let Some(message) = active.recorder.take_error() {
            tracing::error!(%message, "recorder reported an error");
            if let Some(mut active) = self.active.take() {
                if active.recorder.state() != RecorderState::Inactive
                    && let Err(err) = active.recorder.stop()
                {
                    tracing::warn!(error = %err, "recorder stop failed during teardown");
                }
                active.recorder.stream().stop_all();
            }
            return Err(AvatarError::recording(message));
        }
        active.collect();
        Ok(())
    }

    /// One-shot "ended" handler: finalizes the take the first time the audio ends.
    pub fn on_audio_ended(&mut self) -> bool {
        let armed = self
            .active
            .as_mut()
            .is_some_and(|a| std::mem::take(&mut a.stop_on_audio_end));
        if armed {
            tracing::info!("audio ended, stopping recording");
            self.stop();
        }
        armed
    }

    /// Finalize the current take. Idempotent; returns whether a recording was stopped.
    ///
    /// Only the recorder's own tracks are stopped; the audio graph is kept for reuse.
    pub fn stop(&mut self) -> bool {
        let Some(mut active) = self.active.take() else {
            return false;
        };
        if active.recorder.state() != RecorderState::Inactive
            && let Err(err) = active.recorder.stop()
        {
            tracing::error!(error = %err, "failed to stop recorder");
        }
        active.collect();
        active.recorder.stream().stop_all();

        if active.chunks.is_empty() {
            tracing::warn!("recording produced no data");
            return true;
        }
        let blob = Blob::from_chunks(&active.chunks, &active.format.mime_type);
        let url = self.urls.create(blob.clone());
        tracing::info!(
            %url,
            bytes = blob.len(),
            chunks = active.chunks.len(),
            extension = %active.format.extension,
            "recording completed"
        );
        self.result = Some(RecordedVideo {
            url,
            blob,
            format: active.format,
        });
        true
    }

    /// Full teardown: stop, revoke the result URL and close the audio graph.
    pub fn reset(&mut self) {
        self.stop();
        self.discard_result();
        self.graph.release();
        tracing::debug!("recording pipeline reset");
    }

    fn discard_result(&mut self) {
        if let Some(previous) = self.result.take() {
            self.urls.revoke(&previous.url);
            tracing::debug!(url = %previous.url, "revoked recording url");
        }
    }

    pub fn download(&self) -> AvatarResult<DownloadArtifact> {
        self.download_at(Utc::now())
    }

    /// Download artifact named for `now`: `<prefix>-<ISO 8601 with ':' and '.' as '-'>.<ext>`.
    pub fn download_at(&self, now: DateTime<Utc>) -> AvatarResult<DownloadArtifact> {
        let video = self
            .result
            .as_ref()
            .ok_or_else(|| AvatarError::validation("no video to download"))?;
        let filename = download_filename(&self.download_prefix, now, &video.format.extension);
        tracing::info!(%filename, "download prepared");
        Ok(DownloadArtifact {
            url: video.url.clone(),
            filename,
            mime_type: video.blob.mime_type().to_owned(),
            bytes: video.blob.bytes().to_vec(),
        })
    }
}

pub fn download_filename(prefix: &str, now: DateTime<Utc>, extension: &str) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}-{stamp}.{extension}")
}

#[cfg(test)]
#[path = "../../tests/unit/record/pipeline.rs"]
mod tests;
