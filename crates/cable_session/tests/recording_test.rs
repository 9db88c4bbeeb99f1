mod test_utils;

use cable_core::CaptureFormat;
use cable_error::{CableErrorKind, NotReadyErrorKind};
use cable_interface::FileArtifactSink;
use cable_session::{RecordingConfig, RecordingController, RecordingStatus};
use std::sync::Arc;
use test_utils::{MemorySink, MockCapture};

fn controller(capture: MockCapture) -> (RecordingController, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let recording = RecordingController::new(
        Arc::new(capture),
        sink.clone(),
        RecordingConfig::default(),
    );
    (recording, sink)
}

#[tokio::test]
async fn chunks_are_assembled_in_arrival_order() {
    let (recording, sink) = controller(MockCapture::new(
        &["video/webm;codecs=vp9,opus"],
        Some(b"ef"),
    ));

    let format = recording.start(true).await.unwrap();
    assert_eq!(format.mime_type(), "video/webm;codecs=vp9,opus");
    assert_eq!(recording.status(), RecordingStatus::Recording);

    assert!(recording.push_chunk(b"ab".to_vec()));
    assert!(!recording.push_chunk(Vec::new()));
    assert!(recording.push_chunk(b"cd".to_vec()));

    let artifact = recording.stop().await.unwrap().unwrap();
    assert_eq!(artifact.bytes, b"abcdef".to_vec());
    assert_eq!(artifact.chunk_count, 3);
    assert!(artifact.filename.starts_with("interdimensional-cable-"));
    assert!(artifact.filename.ends_with(".webm"));

    assert_eq!(sink.delivered(), vec![artifact]);
    assert_eq!(recording.status(), RecordingStatus::Idle);
    assert_eq!(recording.buffered_chunks(), 0);
}

#[tokio::test]
async fn first_supported_format_wins() {
    let (recording, _) = controller(MockCapture::new(
        &["video/mp4", "video/webm;codecs=vp8,opus"],
        None,
    ));
    let format = recording.start(true).await.unwrap();
    assert_eq!(format, CaptureFormat::new("video/webm;codecs=vp8,opus"));
}

#[tokio::test]
async fn unsupported_device_lists_every_format_tried() {
    let (recording, _) = controller(MockCapture::new(&["video/ogg"], None));

    let err = recording.start(true).await.unwrap_err();
    match err.kind() {
        CableErrorKind::Unsupported(e) => assert_eq!(e.tried.len(), 4),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(recording.status(), RecordingStatus::Idle);
}

#[tokio::test]
async fn start_needs_an_attached_stream() {
    let (recording, _) = controller(MockCapture::new(&["video/webm"], None));
    let err = recording.start(false).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        CableErrorKind::NotReady(e) if e.kind == NotReadyErrorKind::NoStream
    ));
}

#[tokio::test]
async fn second_start_is_refused() {
    let (recording, _) = controller(MockCapture::new(&["video/webm"], None));
    recording.start(true).await.unwrap();

    let err = recording.start(true).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        CableErrorKind::NotReady(e) if e.kind == NotReadyErrorKind::AlreadyRecording
    ));
    assert_eq!(recording.status(), RecordingStatus::Recording);
}

#[tokio::test]
async fn empty_recording_is_an_error_and_releases_the_buffer() {
    let (recording, sink) = controller(MockCapture::new(&["video/webm"], None));
    recording.start(true).await.unwrap();

    let err = recording.stop().await.unwrap_err();
    match err.kind() {
        CableErrorKind::EmptyResult(e) => assert_eq!(e.chunks, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert!(sink.delivered().is_empty());
    assert_eq!(recording.status(), RecordingStatus::Idle);
}

#[tokio::test]
async fn stop_without_recording_is_a_no_op() {
    let (recording, sink) = controller(MockCapture::new(&["video/webm"], None));
    assert!(recording.stop().await.unwrap().is_none());
    assert!(!recording.push_chunk(b"late".to_vec()));
    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn file_sink_writes_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let recording = RecordingController::new(
        Arc::new(MockCapture::new(&["video/mp4"], Some(b"moov"))),
        Arc::new(FileArtifactSink::new(dir.path())),
        RecordingConfig::default().with_file_prefix("test-run".to_string()),
    );

    recording.start(true).await.unwrap();
    recording.push_chunk(b"ftyp".to_vec());
    let artifact = recording.stop().await.unwrap().unwrap();

    assert!(artifact.filename.starts_with("test-run-"));
    assert!(artifact.filename.ends_with(".mp4"));
    let written = std::fs::read(dir.path().join(&artifact.filename)).unwrap();
    assert_eq!(written, b"ftypmoov".to_vec());
}
