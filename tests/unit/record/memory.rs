use super::*;

#[test]
fn one_source_node_per_element() {
    let mut backend = InMemoryMediaBackend::webm_only();
    let mut graph = backend.create_audio_graph(ElementId(1)).unwrap();
    assert!(backend.create_audio_graph(ElementId(1)).is_err());
    assert!(backend.create_audio_graph(ElementId(2)).is_ok());

    graph.close();
    graph.close();
    let ledger = backend.ledger();
    assert_eq!(ledger.graphs_created, 2);
    assert_eq!(ledger.graphs_closed, 1);
    assert!(backend.create_audio_graph(ElementId(1)).is_ok());
}

#[test]
fn recorder_emits_chunks_while_recording_and_on_stop() {
    let mut backend = InMemoryMediaBackend::mp4();
    let opts = RecorderOptions {
        mime_type: "video/mp4;codecs=h264,aac".to_owned(),
        video_bits_per_second: 1_000,
    };
    let mut rec = backend.create_recorder(MediaStream::default(), &opts).unwrap();
    assert!(rec.take_data().is_empty());

    rec.start(Duration::from_millis(100)).unwrap();
    assert_eq!(rec.state(), RecorderState::Recording);
    assert_eq!(rec.take_data().len(), 1);
    assert_eq!(rec.take_data().len(), 1);

    rec.stop().unwrap();
    let last = rec.take_data();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].bytes(), b"chunk-3;");
    assert!(rec.take_data().is_empty());
    assert!(rec.stop().is_err());
    assert_eq!(backend.ledger().recorder_options, vec![opts]);
}

#[test]
fn injected_failures_surface_once() {
    let mut backend = InMemoryMediaBackend::webm_only();
    let opts = RecorderOptions {
        mime_type: "video/webm".to_owned(),
        video_bits_per_second: 1_000,
    };
    let mut rec = backend.create_recorder(MediaStream::default(), &opts).unwrap();
    backend.fail_next_start();
    assert!(rec.start(Duration::from_millis(100)).is_err());
    assert!(rec.start(Duration::from_millis(100)).is_ok());

    backend.emit_recorder_error("encoder crashed");
    assert_eq!(rec.take_error().as_deref(), Some("encoder crashed"));
    assert_eq!(rec.take_error(), None);
}

#[test]
fn without_recorder_refuses_construction() {
    let mut backend = InMemoryMediaBackend::without_recorder();
    assert!(!backend.recorder_supported());
    let opts = RecorderOptions {
        mime_type: "video/webm".to_owned(),
        video_bits_per_second: 1_000,
    };
    assert!(backend.create_recorder(MediaStream::default(), &opts).is_err());
    assert_eq!(backend.ledger().recorders_created, 0);
}
