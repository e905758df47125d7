use super::*;

#[test]
fn defaults_match_playback_constants() {
    let cfg = AvatarConfig::default();
    assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
    assert_eq!(cfg.track_duration_secs, 30.0);
    assert_eq!(cfg.prime_window_secs, 0.1);
    assert_eq!(cfg.max_text_chars, 180);
    assert_eq!(cfg.idle_action, "Idle");
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = AvatarConfig::from_json_str(r#"{ "tick_interval_ms": 50 }"#).unwrap();
    assert_eq!(cfg.tick_interval_ms, 50);
    assert_eq!(cfg.frame_interval_ms, 16);
    assert_eq!(cfg.download_prefix, "avatar-animation");
}

#[test]
fn validation_rejects_zero_periods() {
    assert!(AvatarConfig::from_json_str(r#"{ "tick_interval_ms": 0 }"#).is_err());
    assert!(AvatarConfig::from_json_str(r#"{ "frame_interval_ms": 0 }"#).is_err());
    assert!(AvatarConfig::from_json_str(r#"{ "track_duration_secs": -1.0 }"#).is_err());
    assert!(AvatarConfig::from_json_str(r#"{ "idle_action": "  " }"#).is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = AvatarConfig::from_json_str("{").unwrap_err();
    assert!(matches!(err, AvatarError::Serde(_)));
}
