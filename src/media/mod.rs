//! In-memory media primitives: audio elements, tracks/streams, blobs and object URLs.

pub mod audio;
pub mod blob;
pub mod stream;

pub use audio::{AudioClock, AudioElement, SimulatedAudio};
pub use blob::{Blob, ObjectUrlRegistry};
pub use stream::{MediaKind, MediaStream, MediaTrack, TrackReadyState};
