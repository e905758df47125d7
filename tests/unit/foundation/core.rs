use super::*;

#[test]
fn clamp_track_time_bounds() {
    assert_eq!(clamp_track_time(-3.0, TRACK_DURATION_SECS), 0.0);
    assert_eq!(clamp_track_time(12.5, TRACK_DURATION_SECS), 12.5);
    assert_eq!(clamp_track_time(31.0, TRACK_DURATION_SECS), 30.0);
    assert_eq!(clamp_track_time(f64::NAN, TRACK_DURATION_SECS), 0.0);
    assert_eq!(clamp_track_time(f64::INFINITY, TRACK_DURATION_SECS), 0.0);
}

#[test]
fn round_tenths_snaps_to_drag_resolution() {
    assert_eq!(round_tenths(1.04), 1.0);
    assert_eq!(round_tenths(1.06), 1.1);
    assert_eq!(round_tenths(0.0), 0.0);
}

#[test]
fn track_kind_serializes_lowercase() {
    let json = serde_json::to_string(&TrackKind::Emotion).unwrap();
    assert_eq!(json, "\"emotion\"");
    let back: TrackKind = serde_json::from_str("\"action\"").unwrap();
    assert_eq!(back, TrackKind::Action);
    assert_eq!(TrackKind::Action.to_string(), "action");
}

#[test]
fn ids_display_with_prefix() {
    assert_eq!(KeyframeId(7).to_string(), "kf-7");
    assert_eq!(ElementId(2).to_string(), "audio#2");
}

#[test]
fn secs_to_ms_ignores_non_finite() {
    assert_eq!(secs_to_ms(0.5), 500.0);
    assert_eq!(secs_to_ms(2.0), 2000.0);
    assert_eq!(secs_to_ms(f64::NAN), 0.0);
}

#[test]
fn element_id_serializes_as_bare_number() {
    assert_eq!(serde_json::to_string(&ElementId(7)).unwrap(), "7");
}
