//! Recording pipeline: codec negotiation, audio graph reuse and chunked capture of the rendered
//! avatar plus its voice into one downloadable file.

pub mod backend;
pub mod codec;
pub mod ffmpeg;
pub mod graph;
pub mod memory;
pub mod pipeline;

pub use backend::{AudioGraph, MediaBackend, MediaRecorder, RecorderOptions, RecorderState};
pub use codec::{CODEC_PREFERENCE, CodecCandidate, CodecSupport, NegotiatedFormat, negotiate_format};
pub use ffmpeg::{FfmpegCodecProbe, is_ffmpeg_on_path, parse_encoder_list};
pub use graph::AudioGraphSlot;
pub use memory::{BackendLedger, InMemoryMediaBackend};
pub use pipeline::{
    DownloadArtifact, RecordedVideo, RecordingPipeline, RecordingStatus, download_filename,
};
