use crate::foundation::core::TrackKind;
use crate::foundation::error::AvatarResult;
use crate::media::stream::MediaStream;

/// Downstream consumer of pose/emotion/viseme changes.
///
/// Implementations render the avatar; the schedulers only call these methods and never read
/// state back. An `Err` from any setter marks that single transition as failed. Callers log it and
/// keep going.
pub trait Renderer {
    /// Switch the body pose to the named clip.
    fn play_animation(&mut self, name: &str) -> AvatarResult<()>;
    /// Switch the facial emotion. An empty name means neutral.
    fn update_emotion(&mut self, name: &str) -> AvatarResult<()>;
    /// Switch the mouth shape.
    fn update_viseme(&mut self, viseme_id: u32) -> AvatarResult<()>;
    /// Live capture of the rendered output. Only its video tracks are used.
    fn video_stream(&mut self) -> AvatarResult<MediaStream>;
}

/// Drive `renderer` to `value` on the given track.
pub fn apply_track_value(
    renderer: &mut dyn Renderer,
    track: TrackKind,
    value: &str,
) -> AvatarResult<()> {
    match track {
        TrackKind::Action => renderer.play_animation(value),
        TrackKind::Emotion => renderer.update_emotion(value),
    }
}
