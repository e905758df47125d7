use crate::foundation::core::TrackKind;
use crate::foundation::error::{AvatarError, AvatarResult};
use std::collections::BTreeSet;

/// Category of a registered animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Body pose clip.
    Action,
    /// Facial expression.
    Emotion,
    /// Mouth shape.
    Viseme,
}

impl From<TrackKind> for AnimationKind {
    fn from(track: TrackKind) -> Self {
        match track {
            TrackKind::Action => Self::Action,
            TrackKind::Emotion => Self::Emotion,
        }
    }
}

/// Playback hints for action clips.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationParameters {
    /// Whether the clip loops.
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looped: Option<bool>,
    /// Nominal clip duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Playback speed multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

/// One registry entry.
///
/// `actual_name` is what the renderer understands, `call_name` is the stable code identifier and
/// `display_name` is a localization key for UI labels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDef {
    pub actual_name: String,
    pub call_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<AnimationParameters>,
    /// Emotion strength in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    /// Morph targets driven by an emotion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub morph_targets: Vec<String>,
    /// Viseme id for mouth-shape entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viseme_id: Option<u32>,
}

impl AnimationDef {
    /// Minimal enabled entry with display key `animate.<kind>s.<call_name>`.
    pub fn new(kind: AnimationKind, actual_name: &str, call_name: &str) -> Self {
        let group = match kind {
            AnimationKind::Action => "animate.actions",
            AnimationKind::Emotion => "animate.emotions",
            AnimationKind::Viseme => "viseme",
        };
        Self {
            actual_name: actual_name.to_owned(),
            call_name: call_name.to_owned(),
            display_name: format!("{group}.{call_name}"),
            kind,
            description: None,
            category: None,
            enabled: true,
            parameters: None,
            intensity: None,
            morph_targets: Vec::new(),
            viseme_id: None,
        }
    }
}

/// Animations available for one avatar model.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSet {
    #[serde(default)]
    pub actions: Vec<AnimationDef>,
    #[serde(default)]
    pub emotions: Vec<AnimationDef>,
    #[serde(default)]
    pub visemes: Vec<AnimationDef>,
}

impl AnimationSet {
    pub fn validate(&self) -> AvatarResult<()> {
        let mut call_names = BTreeSet::new();
        for (expected, defs) in [
            (AnimationKind::Action, &self.actions),
            (AnimationKind::Emotion, &self.emotions),
            (AnimationKind::Viseme, &self.visemes),
        ] {
            for def in defs {
                if def.kind != expected {
                    return Err(AvatarError::validation(format!(
                        "animation '{}' is listed under {expected:?} but has type {:?}",
                        def.call_name, def.kind
                    )));
                }
                if def.actual_name.is_empty() || def.call_name.is_empty() {
                    return Err(AvatarError::validation(
                        "animation actualName/callName must be non-empty",
                    ));
                }
                if !call_names.insert(def.call_name.as_str()) {
                    return Err(AvatarError::validation(format!(
                        "duplicate animation callName '{}'",
                        def.call_name
                    )));
                }
                if expected == AnimationKind::Viseme && def.viseme_id.is_none() {
                    return Err(AvatarError::validation(format!(
                        "viseme '{}' has no visemeId",
                        def.call_name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn by_kind(&self, kind: AnimationKind) -> &[AnimationDef] {
        match kind {
            AnimationKind::Action => &self.actions,
            AnimationKind::Emotion => &self.emotions,
            AnimationKind::Viseme => &self.visemes,
        }
    }

    fn all(&self) -> impl Iterator<Item = &AnimationDef> {
        self.actions
            .iter()
            .chain(self.emotions.iter())
            .chain(self.visemes.iter())
    }

    pub fn by_call_name(&self, call_name: &str) -> Option<&AnimationDef> {
        self.all().find(|d| d.call_name == call_name)
    }

    pub fn by_actual_name(&self, actual_name: &str) -> Option<&AnimationDef> {
        self.all().find(|d| d.actual_name == actual_name)
    }

    pub fn viseme(&self, viseme_id: u32) -> Option<&AnimationDef> {
        self.visemes.iter().find(|d| d.viseme_id == Some(viseme_id))
    }

    /// Renderer names of the enabled entries for `track`, in registry order.
    pub fn enabled_names(&self, track: TrackKind) -> Vec<&str> {
        self.by_kind(track.into())
            .iter()
            .filter(|d| d.enabled)
            .map(|d| d.actual_name.as_str())
            .collect()
    }

    /// `true` when `name` is an enabled renderer name on `track`.
    pub fn is_enabled(&self, track: TrackKind, name: &str) -> bool {
        self.by_kind(track.into())
            .iter()
            .any(|d| d.enabled && d.actual_name == name)
    }

    /// Value given to a freshly added keyframe.
    ///
    /// Actions prefer `idle_action` when it is enabled; otherwise (and for emotions) the first
    /// enabled entry wins.
    pub fn default_value(&self, track: TrackKind, idle_action: &str) -> Option<&str> {
        if track == TrackKind::Action && self.is_enabled(track, idle_action) {
            return self
                .actions
                .iter()
                .find(|d| d.actual_name == idle_action)
                .map(|d| d.actual_name.as_str());
        }
        self.enabled_names(track).into_iter().next()
    }

    /// Localization key for `name`, or the name itself when unknown.
    pub fn display_name<'a>(&'a self, track: TrackKind, name: &'a str) -> &'a str {
        self.by_kind(track.into())
            .iter()
            .find(|d| d.actual_name == name)
            .map(|d| d.display_name.as_str())
            .unwrap_or(name)
    }

    pub fn ensure_enabled(&self, track: TrackKind, name: &str) -> AvatarResult<()> {
        if self.is_enabled(track, name) {
            return Ok(());
        }
        Err(AvatarError::validation(format!(
            "'{name}' is not an enabled {track} animation"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/set.rs"]
mod tests;
