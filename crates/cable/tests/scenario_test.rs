use cable::{
    CueOrigin, InMemoryPipeline, InMemoryTransport, LogRole, SessionConfig, SessionController,
    SessionPhase, StoryEngine, StreamTransport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Local {
    controller: SessionController,
    transport: Arc<InMemoryTransport>,
    pipeline: Arc<InMemoryPipeline>,
}

fn local() -> Local {
    let engine = Arc::new(StoryEngine::new());
    let transport = Arc::new(InMemoryTransport::new());
    let pipeline = Arc::new(InMemoryPipeline::new());
    let controller = SessionController::builder()
        .config(SessionConfig::default())
        .catalog(engine.clone())
        .narrative(engine)
        .pipeline(pipeline.clone())
        .transport(transport.clone())
        .build()
        .unwrap();
    Local {
        controller,
        transport,
        pipeline,
    }
}

#[tokio::test(start_paused = true)]
async fn offline_session_runs_end_to_end() {
    let local = local();
    let themes = local.controller.boot().await;
    assert_eq!(themes.len(), 3);

    local.controller.select_theme_by_id("lego_flux").await.unwrap();
    let opened = local.transport.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(local.pipeline.loads().len(), 1);

    let view = local.controller.view();
    assert_eq!(view.phase, SessionPhase::Active);
    let narrative = view.narrative.unwrap();
    assert!(narrative.story_text().contains("Lego Flux"));
    assert_eq!(narrative.cues().len(), 4);
    assert_eq!(opened[0].primary_text(), narrative.visual_directive());

    local
        .controller
        .submit_cue("Build a bridge", CueOrigin::Manual)
        .await
        .unwrap();
    let updates = local.transport.updates();
    assert_eq!(updates.len(), 1);
    let directive = updates[0].primary_text().unwrap();
    assert!(directive.contains("inspired by cue: Build a bridge"));
    assert!(directive.ends_with("highly detailed, 4K quality"));

    let narrative = local.controller.view().narrative.unwrap();
    assert!(narrative
        .prompt_log()
        .iter()
        .any(|entry| *entry.role() == LogRole::Cue && entry.text() == "Build a bridge"));

    sleep(Duration::from_millis(8500)).await;
    let updates = local.transport.updates();
    assert_eq!(updates.len(), 2);
    assert!(updates[1]
        .primary_text()
        .unwrap()
        .contains("inspired by cue: Continue the current scene with new possibilities"));

    local.controller.stop().await;
    assert!(!local.transport.status().is_present());
    assert_eq!(local.controller.view().phase, SessionPhase::Idle);
}
