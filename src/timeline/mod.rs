//! Keyframe timeline authoring model: two tracks of time-stamped directives on a fixed-length
//! timeline, plus the pointer geometry used by click-to-add and drag editing.

pub mod geometry;
pub mod keyframe;
pub mod model;

pub use geometry::{DRAG_INSET_PX, TimeMarkers, TrackGeometry};
pub use keyframe::{Keyframe, KeyframePatch, sorted_by_time};
pub use model::Timeline;
