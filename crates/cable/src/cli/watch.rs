//! Local viewing session.

use cable::{
    CableResult, CueOrigin, FileArtifactSink, InMemoryPipeline, InMemoryTransport, NullCapture,
    SessionConfig, SessionController, SessionView, StoryEngine,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Tunes into `theme_id`, submits `cues`, then lets the countdown drive the
/// story for `seconds` before stopping.
pub async fn watch(
    theme_id: &str,
    cues: &[String],
    seconds: u64,
    config_path: Option<&Path>,
) -> CableResult<()> {
    let config = match config_path {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::load()?,
    };
    info!(
        interval = config.action_interval_secs(),
        pipeline_id = %config.pipeline().pipeline_id(),
        "Configuration loaded"
    );

    let engine = Arc::new(StoryEngine::new());
    let controller = SessionController::builder()
        .capture(Arc::new(NullCapture::new(config.recording().formats().clone())))
        .sink(Arc::new(FileArtifactSink::new(config.recording().output_dir())))
        .config(config)
        .catalog(engine.clone())
        .narrative(engine)
        .pipeline(Arc::new(InMemoryPipeline::new()))
        .transport(Arc::new(InMemoryTransport::new()))
        .build()?;

    let printer = tokio::spawn(print_story(controller.subscribe()));

    controller.boot().await;
    controller.select_theme_by_id(theme_id).await?;

    for cue in cues {
        if let Err(e) = controller.submit_cue(cue, CueOrigin::Manual).await {
            warn!(error = %e, cue = %cue, "Cue rejected");
        }
    }

    tokio::time::sleep(Duration::from_secs(seconds)).await;
    controller.stop().await;
    printer.abort();

    Ok(())
}

/// Prints each new story beat, its visual directive and the suggested next cue.
async fn print_story(mut views: watch::Receiver<SessionView>) {
    let mut printed = String::new();
    let mut last_notice: Option<String> = None;

    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();

        match &view.notice {
            Some(notice) if view.notice != last_notice => eprintln!("! {}", notice),
            _ => {}
        }
        last_notice = view.notice;

        let Some(narrative) = view.narrative else {
            printed.clear();
            continue;
        };

        let story = narrative.story_text();
        if *story == printed {
            continue;
        }
        match story.strip_prefix(printed.as_str()) {
            Some(fresh) => println!("{}", fresh.trim()),
            None => println!("{}", story),
        }
        printed = story.clone();

        if let Some(visual) = narrative.visual_directive() {
            println!("  [screen] {}", visual);
        }
        if let Some(cue) = narrative.recommended_cue() {
            println!("  [next in {}s] {}", view.countdown.remaining, cue);
        }
    }
}
