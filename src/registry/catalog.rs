use crate::foundation::error::{AvatarError, AvatarResult};
use crate::registry::set::{AnimationDef, AnimationKind, AnimationParameters, AnimationSet};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the catalog entry used when a model has no dedicated animation set.
pub const DEFAULT_MODEL: &str = "default";

// (actual, call, category, loop, duration)
const ACTIONS: &[(&str, &str, &str, bool, f64)] = &[
    ("Idle", "idle", "basic", true, 2.0),
    ("Walking", "walking", "movement", true, 1.5),
    ("Running", "running", "movement", true, 1.0),
    ("Jump", "jump", "movement", false, 1.5),
    ("Wave", "wave", "gesture", false, 2.0),
    ("Dance", "dance", "entertainment", true, 3.0),
    ("No", "no", "gesture", false, 1.5),
    ("Punch", "punch", "combat", false, 2.0),
    ("ThumbsUp", "thumbsUp", "gesture", false, 2.0),
    ("WalkJump", "walkJump", "movement", true, 2.0),
    ("Yes", "yes", "gesture", false, 1.5),
];

const EMOTIONS: &[(&str, &str)] = &[
    ("Angry", "angry"),
    ("Surprised", "surprised"),
    ("Sad", "sad"),
];

// Azure viseme ids 0..=22 and their phoneme display keys.
const VISEME_KEYS: [&str; 23] = [
    "silence", "aa", "aa", "ao", "ao", "ao", "ax", "ax", "ax", "ay", "ay", "ay", "b", "ch", "d",
    "dh", "er", "er", "er", "ey", "ey", "ey", "f",
];

/// Built-in animation set shipped with the default avatar.
pub fn builtin_animation_set() -> AnimationSet {
    let actions = ACTIONS
        .iter()
        .map(|&(actual, call, category, looped, duration)| {
            let mut def = AnimationDef::new(AnimationKind::Action, actual, call);
            def.category = Some(category.to_owned());
            def.parameters = Some(AnimationParameters {
                looped: Some(looped),
                duration: Some(duration),
                speed: Some(if actual == "Running" { 1.2 } else { 1.0 }),
            });
            def
        })
        .collect();

    let emotions = EMOTIONS
        .iter()
        .map(|&(actual, call)| {
            let mut def = AnimationDef::new(AnimationKind::Emotion, actual, call);
            def.intensity = Some(1.0);
            def.morph_targets = vec![call.to_owned()];
            def
        })
        .collect();

    let visemes = VISEME_KEYS
        .iter()
        .enumerate()
        .map(|(id, key)| {
            let name = format!("viseme_{id}");
            let mut def = AnimationDef::new(AnimationKind::Viseme, &name, &name);
            def.display_name = format!("viseme.{key}");
            def.viseme_id = Some(id as u32);
            def
        })
        .collect();

    AnimationSet {
        actions,
        emotions,
        visemes,
    }
}

/// Per-model animation sets with a `default` fallback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelCatalog {
    pub models: BTreeMap<String, AnimationSet>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(DEFAULT_MODEL.to_owned(), builtin_animation_set());
        Self { models }
    }
}

impl ModelCatalog {
    pub fn from_json_str(json: &str) -> AvatarResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> AvatarResult<Self> {
        use anyhow::Context as _;
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model catalog '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> AvatarResult<()> {
        for (name, set) in &self.models {
            set.validate().map_err(|e| {
                AvatarError::validation(format!("model '{name}' animation set: {e}"))
            })?;
        }
        Ok(())
    }

    /// Animation set for `model`, falling back to the `default` entry.
    pub fn for_model(&self, model: &str) -> Option<&AnimationSet> {
        if let Some(set) = self.models.get(model) {
            return Some(set);
        }
        tracing::debug!(model, "no dedicated animation set, using default");
        self.models.get(DEFAULT_MODEL)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/catalog.rs"]
mod tests;
