//! Animation/emotion/viseme registry.
//!
//! The timeline validates keyframe values against an [`AnimationSet`]; which set applies is chosen
//! per avatar model through a [`ModelCatalog`].

pub mod catalog;
pub mod set;

pub use catalog::{DEFAULT_MODEL, ModelCatalog, builtin_animation_set};
pub use set::{AnimationDef, AnimationKind, AnimationParameters, AnimationSet};
