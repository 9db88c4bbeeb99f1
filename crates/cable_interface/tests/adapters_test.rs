use cable_core::{CaptureFormat, PromptParams, RecordingArtifact};
use cable_error::CableErrorKind;
use cable_interface::{
    ArtifactSink, FileArtifactSink, InMemoryTransport, MediaCapture, NullCapture, StreamTransport,
};

#[tokio::test]
async fn update_without_stream_is_a_transport_error() {
    let transport = InMemoryTransport::new();
    let err = transport
        .send_parameter_update(PromptParams::blend("sky city"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), CableErrorKind::Backend(_)));
    assert!(transport.updates().is_empty());
}

#[tokio::test]
async fn close_is_idempotent() {
    let transport = InMemoryTransport::new();
    transport.open(PromptParams::blend("neon city")).await.unwrap();
    transport.close().await.unwrap();
    transport.close().await.unwrap();
    assert_eq!(transport.closes(), 1);
    assert!(!transport.status().is_present());
}

#[tokio::test]
async fn disconnect_drops_the_stream_without_a_close() {
    let transport = InMemoryTransport::new();
    transport.open(PromptParams::blend("neon city")).await.unwrap();
    transport.disconnect();
    assert!(!transport.status().is_present());
    assert_eq!(transport.closes(), 0);
}

#[tokio::test(start_paused = true)]
async fn delayed_close_tears_down_before_returning() {
    let transport = std::sync::Arc::new(
        InMemoryTransport::new().with_close_delay(std::time::Duration::from_secs(1)),
    );
    transport.open(PromptParams::blend("neon city")).await.unwrap();

    let closing = {
        let transport = transport.clone();
        tokio::spawn(async move { transport.close().await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert!(!transport.status().is_present());
    assert!(!closing.is_finished());

    closing.await.unwrap().unwrap();
    assert_eq!(transport.closes(), 1);
}

#[tokio::test]
async fn null_capture_only_supports_listed_formats() {
    let capture = NullCapture::new(vec![CaptureFormat::new("video/webm")]);
    assert!(capture.supports(&CaptureFormat::new("video/webm")));
    assert!(!capture.supports(&CaptureFormat::new("video/mp4")));
    assert_eq!(capture.finish().await.unwrap(), None);
}

#[tokio::test]
async fn file_sink_writes_artifact_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FileArtifactSink::new(dir.path().join("recordings"));
    let artifact = RecordingArtifact {
        filename: "interdimensional-cable-20260101-120000-000.webm".to_string(),
        format: CaptureFormat::new("video/webm"),
        bytes: vec![1, 2, 3, 4],
        chunk_count: 2,
    };

    sink.deliver(&artifact).await.unwrap();

    let written = std::fs::read(sink.dir().join(&artifact.filename)).unwrap();
    assert_eq!(written, vec![1, 2, 3, 4]);
}
