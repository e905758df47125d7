use super::*;

const LISTING: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus (codec opus)
";

#[test]
fn parses_encoder_names_after_separator() {
    assert_eq!(
        parse_encoder_list(LISTING),
        vec!["libx264", "libvpx-vp9", "aac", "libopus"]
    );
    assert!(parse_encoder_list("no separator here").is_empty());
}

#[test]
fn maps_mime_codecs_to_encoders() {
    let probe = FfmpegCodecProbe::from_encoders(parse_encoder_list(LISTING));
    assert!(probe.is_type_supported("video/mp4;codecs=h264,aac"));
    assert!(probe.is_type_supported("video/mp4;codecs=avc1.42E01E,mp4a.40.2"));
    assert!(probe.is_type_supported("video/webm;codecs=vp9,opus"));
    assert!(probe.is_type_supported("video/webm"));
    assert!(!probe.is_type_supported("video/webm;codecs=vp8,opus"));
    assert!(!probe.is_type_supported("audio/ogg"));
}

#[test]
fn opus_only_build_degrades_to_webm() {
    let probe = FfmpegCodecProbe::from_encoders(["libvpx-vp9", "libopus"]);
    assert!(!probe.is_type_supported("video/mp4;codecs=h264,aac"));
    assert!(!probe.is_type_supported("video/webm;codecs=h264,opus"));
    assert!(probe.is_type_supported("video/webm;codecs=vp9,opus"));
}

#[test]
fn empty_probe_supports_nothing() {
    let probe = FfmpegCodecProbe::default();
    assert!(!probe.is_type_supported("video/webm"));
    assert!(!probe.has_encoder("libx264"));
}
