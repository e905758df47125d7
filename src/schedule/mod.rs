//! Playback schedulers: the coarse animation timer and the frame-accurate viseme loop.
//!
//! Both read the same audio clock and never write to it, so they run side by side without
//! coordination.

pub mod animation;
pub mod state;
pub mod viseme;

pub use animation::{AnimationScheduler, TickOutcome};
pub use state::{AnimationRuntimeState, PassToken, SchedulerPhase};
pub use viseme::{FrameOutcome, VisemeEvent, VisemeQueue, VisemeSynchronizer};
