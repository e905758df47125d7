use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::foundation::core::ElementId;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::media::blob::Blob;
use crate::media::stream::{MediaKind, MediaStream, MediaTrack};
use crate::record::backend::{AudioGraph, MediaBackend, MediaRecorder, RecorderOptions, RecorderState};
use crate::record::codec::CodecSupport;

/// Everything the in-memory backend has been asked to do.
#[derive(Clone, Debug, Default)]
pub struct BackendLedger {
    pub graphs_created: usize,
    pub graphs_closed: usize,
    pub destinations_created: usize,
    /// Audio tracks handed out by recording destinations. Clones share live state.
    pub destination_tracks: Vec<MediaTrack>,
    /// Elements that currently have a source node.
    pub connected: BTreeSet<ElementId>,
    pub recorders_created: usize,
    pub recorder_options: Vec<RecorderOptions>,
    /// Recorders taken from recording back to inactive.
    pub recorders_stopped: usize,
    pending_error: Option<String>,
    fail_next_start: bool,
}

type SharedLedger = Arc<Mutex<BackendLedger>>;

fn lock(ledger: &SharedLedger) -> MutexGuard<'_, BackendLedger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media backend that encodes nothing and keeps a ledger of calls.
///
/// Recorders emit one small chunk per drain while recording plus a final chunk on stop, which is
/// enough to exercise chunked collection and blob assembly.
#[derive(Clone, Debug)]
pub struct InMemoryMediaBackend {
    supported: BTreeSet<String>,
    recorder_supported: bool,
    ledger: SharedLedger,
}

impl InMemoryMediaBackend {
    pub fn new<I, S>(supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: supported.into_iter().map(Into::into).collect(),
            recorder_supported: true,
            ledger: SharedLedger::default(),
        }
    }

    /// Supports WebM only (VP9/H.264 with Opus).
    pub fn webm_only() -> Self {
        Self::new([
            "video/webm;codecs=vp9,opus",
            "video/webm;codecs=h264,opus",
            "video/webm",
        ])
    }

    /// Supports H.264/AAC in MP4.
    pub fn mp4() -> Self {
        Self::new(["video/mp4;codecs=h264,aac", "video/webm"])
    }

    /// No `MediaRecorder` at all.
    pub fn without_recorder() -> Self {
        Self {
            recorder_supported: false,
            ..Self::new(Vec::<String>::new())
        }
    }

    pub fn ledger(&self) -> BackendLedger {
        lock(&self.ledger).clone()
    }

    /// Deliver an error event to the live recorder on its next drain.
    pub fn emit_recorder_error(&self, message: impl Into<String>) {
        lock(&self.ledger).pending_error = Some(message.into());
    }

    /// Make the next recorder `start` fail.
    pub fn fail_next_start(&self) {
        lock(&self.ledger).fail_next_start = true;
    }
}

impl CodecSupport for InMemoryMediaBackend {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported.contains(mime_type)
    }
}

impl MediaBackend for InMemoryMediaBackend {
    fn recorder_supported(&self) -> bool {
        self.recorder_supported
    }

    fn create_audio_graph(&mut self, element: ElementId) -> AvatarResult<Box<dyn AudioGraph>> {
        let mut ledger = lock(&self.ledger);
        if !ledger.connected.insert(element) {
            return Err(AvatarError::recording(format!(
                "{element} is already connected to an audio source node"
            )));
        }
        ledger.graphs_created += 1;
        Ok(Box::new(InMemoryAudioGraph {
            element,
            ledger: Arc::clone(&self.ledger),
            closed: false,
        }))
    }

    fn create_recorder(
        &mut self,
        stream: MediaStream,
        options: &RecorderOptions,
    ) -> AvatarResult<Box<dyn MediaRecorder>> {
        if !self.recorder_supported {
            return Err(AvatarError::recording("MediaRecorder is not available"));
        }
        let mut ledger = lock(&self.ledger);
        ledger.recorders_created += 1;
        ledger.recorder_options.push(options.clone());
        Ok(Box::new(InMemoryRecorder {
            stream,
            mime_type: options.mime_type.clone(),
            state: RecorderState::Inactive,
            seq: 0,
            pending: Vec::new(),
            ledger: Arc::clone(&self.ledger),
        }))
    }
}

#[derive(Debug)]
struct InMemoryAudioGraph {
    element: ElementId,
    ledger: SharedLedger,
    closed: bool,
}

impl AudioGraph for InMemoryAudioGraph {
    fn element(&self) -> ElementId {
        self.element
    }

    fn create_recording_destination(&mut self) -> AvatarResult<MediaStream> {
        if self.closed {
            return Err(AvatarError::recording("audio context is closed"));
        }
        let track = MediaTrack::new(MediaKind::Audio, "recording-destination");
        let mut ledger = lock(&self.ledger);
        ledger.destinations_created += 1;
        ledger.destination_tracks.push(track.clone());
        Ok(MediaStream::new(vec![track]))
    }

    fn disconnect(&mut self) {}

    fn close(&mut self) {
        if std::mem::replace(&mut self.closed, true) {
            return;
        }
        let mut ledger = lock(&self.ledger);
        ledger.graphs_closed += 1;
        ledger.connected.remove(&self.element);
    }
}

#[derive(Debug)]
struct InMemoryRecorder {
    stream: MediaStream,
    mime_type: String,
    state: RecorderState,
    seq: u64,
    pending: Vec<Blob>,
    ledger: SharedLedger,
}

impl InMemoryRecorder {
    fn emit(&mut self) {
        self.seq += 1;
        let bytes = format!("chunk-{};", self.seq).into_bytes();
        self.pending.push(Blob::new(self.mime_type.clone(), bytes));
    }
}

impl MediaRecorder for InMemoryRecorder {
    fn start(&mut self, timeslice: Duration) -> AvatarResult<()> {
        if std::mem::take(&mut lock(&self.ledger).fail_next_start) {
            return Err(AvatarError::recording("recorder refused to start"));
        }
        if self.state != RecorderState::Inactive {
            return Err(AvatarError::recording("recorder already started"));
        }
        if timeslice.is_zero() {
            return Err(AvatarError::recording("timeslice must be non-zero"));
        }
        self.state = RecorderState::Recording;
        Ok(())
    }

    fn stop(&mut self) -> AvatarResult<()> {
        if self.state == RecorderState::Inactive {
            return Err(AvatarError::recording("recorder is not active"));
        }
        self.emit();
        self.state = RecorderState::Inactive;
        lock(&self.ledger).recorders_stopped += 1;
        Ok(())
    }

    fn state(&self) -> RecorderState {
        self.state
    }

    fn stream(&self) -> &MediaStream {
        &self.stream
    }

    fn take_data(&mut self) -> Vec<Blob> {
        if self.state == RecorderState::Recording {
            self.emit();
        }
        std::mem::take(&mut self.pending)
    }

    fn take_error(&mut self) -> Option<String> {
        lock(&self.ledger).pending_error.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/memory.rs"]
mod tests;
