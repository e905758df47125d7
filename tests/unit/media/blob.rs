use super::*;

#[test]
fn from_chunks_concatenates_in_order() {
    let chunks = vec![
        Blob::new("video/webm", vec![1, 2]),
        Blob::new("video/webm", vec![]),
        Blob::new("video/webm", vec![3]),
    ];
    let blob = Blob::from_chunks(&chunks, "video/mp4;codecs=h264,aac");
    assert_eq!(blob.bytes(), &[1, 2, 3]);
    assert_eq!(blob.mime_type(), "video/mp4;codecs=h264,aac");
    assert_eq!(blob.len(), 3);
}

#[test]
fn urls_are_unique_and_revocable_once() {
    let mut urls = ObjectUrlRegistry::new("audio");
    let a = urls.create(Blob::new("audio/wav", vec![0]));
    let b = urls.create(Blob::new("audio/wav", vec![1]));
    assert_ne!(a, b);
    assert!(a.starts_with("blob:avatar-sync/audio/"));
    assert_eq!(urls.live_count(), 2);

    assert!(urls.revoke(&a));
    assert!(!urls.revoke(&a));
    assert!(urls.resolve(&a).is_none());
    assert_eq!(urls.resolve(&b).unwrap().bytes(), &[1]);
    assert_eq!(urls.live_count(), 1);
}
