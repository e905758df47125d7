use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AvatarError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AvatarError::precondition("x")
            .to_string()
            .contains("precondition failed:")
    );
    assert!(
        AvatarError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        AvatarError::recording("x")
            .to_string()
            .contains("recording error:")
    );
    assert!(
        AvatarError::synthesis("x")
            .to_string()
            .contains("synthesis error:")
    );
    assert!(
        AvatarError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AvatarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_message_hides_detail() {
    let err = AvatarError::recording("MediaRecorder exploded at chunk 7");
    assert_eq!(err.user_message(), "recording failed");
    assert!(!err.user_message().contains("chunk"));
    assert_eq!(
        AvatarError::synthesis("503").user_message(),
        "synthesis failed"
    );
}

#[test]
fn serde_json_errors_convert() {
    let err: AvatarError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, AvatarError::Serde(_)));
}
