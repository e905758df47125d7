//! Session orchestration: the cooperative event loop and the avatar session that ties the
//! timeline, schedulers, speech and recording together.

pub mod avatar_session;
pub mod event_loop;

pub use avatar_session::AvatarSession;
pub use event_loop::{EventLoop, LoopSource};
