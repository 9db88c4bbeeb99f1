use cable_core::CaptureFormat;
use cable_error::CableErrorKind;
use cable_session::{RecordingConfig, SessionConfig};
use std::io::Write;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn bundled_defaults_match_code_defaults() {
    let file = write_config("");
    let loaded = SessionConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded, SessionConfig::default());
}

#[test]
fn file_overrides_layer_over_defaults() {
    let file = write_config(
        r#"
action_interval_secs = 5

[pipeline]
seed = 7

[recording]
file_prefix = "late-night"
"#,
    );
    let config = SessionConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.action_interval_secs(), 5);
    assert_eq!(*config.pipeline().seed(), 7);
    assert_eq!(config.pipeline().pipeline_id(), "longlive");
    assert_eq!(config.recording().file_prefix(), "late-night");
    assert_eq!(config.recording().formats()[0], CaptureFormat::new("video/webm;codecs=vp9,opus"));
    assert_eq!(config.download_timeout(), Duration::from_secs(900));
    assert_eq!(config.download_poll_interval(), Duration::from_secs(4));
}

#[test]
fn zero_interval_is_rejected() {
    let file = write_config("action_interval_secs = 0\n");
    let err = SessionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), CableErrorKind::Config(_)));
    assert!(err.to_string().contains("action_interval_secs"));
}

#[test]
fn empty_format_list_is_rejected() {
    let config = SessionConfig::default()
        .with_recording(RecordingConfig::default().with_formats(Vec::new()));
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("recording.formats"));
}

#[test]
fn malformed_file_is_a_config_error() {
    let file = write_config("action_interval_secs = \"soon\"\n");
    let err = SessionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), CableErrorKind::Config(_)));
}

#[test]
fn timeout_shorter_than_poll_is_rejected() {
    let config = SessionConfig::default()
        .with_download_poll_secs(10)
        .with_download_timeout_secs(5);
    assert!(config.validate().is_err());
}
