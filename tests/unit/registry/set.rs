use super::*;
use crate::registry::catalog::builtin_animation_set;

#[test]
fn builtin_set_is_valid() {
    builtin_animation_set().validate().unwrap();
}

#[test]
fn default_values_follow_track_rules() {
    let set = builtin_animation_set();
    assert_eq!(set.default_value(TrackKind::Action, "Idle"), Some("Idle"));
    assert_eq!(set.default_value(TrackKind::Emotion, "Idle"), Some("Angry"));
}

#[test]
fn disabled_entries_are_not_offered() {
    let mut set = builtin_animation_set();
    for def in &mut set.actions {
        if def.actual_name == "Idle" {
            def.enabled = false;
        }
    }
    assert!(!set.is_enabled(TrackKind::Action, "Idle"));
    assert!(!set.enabled_names(TrackKind::Action).contains(&"Idle"));
    // Idle disabled: fall back to the first enabled action.
    assert_eq!(set.default_value(TrackKind::Action, "Idle"), Some("Walking"));
    assert!(set.ensure_enabled(TrackKind::Action, "Idle").is_err());
}

#[test]
fn names_are_scoped_to_their_track() {
    let set = builtin_animation_set();
    assert!(set.is_enabled(TrackKind::Emotion, "Sad"));
    assert!(!set.is_enabled(TrackKind::Action, "Sad"));
    assert!(set.ensure_enabled(TrackKind::Action, "Wave").is_ok());
}

#[test]
fn lookups_by_name_and_viseme_id() {
    let set = builtin_animation_set();
    assert_eq!(set.by_call_name("thumbsUp").unwrap().actual_name, "ThumbsUp");
    assert_eq!(set.by_actual_name("Surprised").unwrap().call_name, "surprised");
    assert_eq!(set.viseme(12).unwrap().display_name, "viseme.b");
    assert!(set.viseme(99).is_none());
    assert_eq!(set.display_name(TrackKind::Action, "Wave"), "animate.actions.wave");
    assert_eq!(set.display_name(TrackKind::Action, "Moonwalk"), "Moonwalk");
}

#[test]
fn duplicate_call_names_are_rejected() {
    let mut set = builtin_animation_set();
    let dup = set.actions[0].clone();
    set.actions.push(dup);
    assert!(set.validate().is_err());
}

#[test]
fn json_uses_camel_case_fields() {
    let json = r#"{
        "actions": [{ "actualName": "Idle", "callName": "idle", "displayName": "x", "type": "action",
                      "parameters": { "loop": true } }],
        "emotions": [{ "actualName": "Sad", "callName": "sad", "displayName": "y", "type": "emotion",
                       "enabled": false }]
    }"#;
    let set: AnimationSet = serde_json::from_str(json).unwrap();
    set.validate().unwrap();
    assert_eq!(set.actions[0].parameters.as_ref().unwrap().looped, Some(true));
    assert!(set.actions[0].enabled);
    assert!(!set.emotions[0].enabled);
    assert_eq!(set.default_value(TrackKind::Emotion, "Idle"), None);
}
