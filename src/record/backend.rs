use std::time::Duration;

use crate::foundation::core::ElementId;
use crate::foundation::error::AvatarResult;
use crate::media::blob::Blob;
use crate::media::stream::MediaStream;
use crate::record::codec::CodecSupport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    Inactive,
    Recording,
    Paused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecorderOptions {
    pub mime_type: String,
    pub video_bits_per_second: u32,
}

/// Encoder over a combined audio/video stream.
///
/// Data arrives incrementally: while recording, each `timeslice` yields one chunk that the owner
/// drains with [`MediaRecorder::take_data`]. After `stop` the final chunk is drained the same way.
pub trait MediaRecorder {
    fn start(&mut self, timeslice: Duration) -> AvatarResult<()>;
    fn stop(&mut self) -> AvatarResult<()>;
    fn state(&self) -> RecorderState;
    fn stream(&self) -> &MediaStream;
    /// Chunks delivered since the last call, in order.
    fn take_data(&mut self) -> Vec<Blob>;
    /// Asynchronous error reported since the last call, if any.
    fn take_error(&mut self) -> Option<String>;
}

/// Audio context plus the one source node bound to an audio element.
///
/// The source keeps feeding the speakers; every recording gets its own destination stream.
pub trait AudioGraph {
    fn element(&self) -> ElementId;
    fn create_recording_destination(&mut self) -> AvatarResult<MediaStream>;
    fn disconnect(&mut self);
    fn close(&mut self);
}

/// Platform media services the recording pipeline depends on.
pub trait MediaBackend: CodecSupport {
    /// Whether a recorder can be constructed at all.
    fn recorder_supported(&self) -> bool;
    /// Bind a new source node to `element`. Binding one element twice is an error.
    fn create_audio_graph(&mut self, element: ElementId) -> AvatarResult<Box<dyn AudioGraph>>;
    fn create_recorder(
        &mut self,
        stream: MediaStream,
        options: &RecorderOptions,
    ) -> AvatarResult<Box<dyn MediaRecorder>>;
}
