//! Renderer seam. 3D rendering itself lives outside this crate.

pub mod log;
pub mod renderer;

pub use log::{CallLogRenderer, LoggedCall, RendererCall};
pub use renderer::{Renderer, apply_track_value};
