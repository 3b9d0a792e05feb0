use std::sync::Arc;

use chrono::{Datelike, Utc};

use sacvs_verify::error::{IntakeError, WorkflowError};
use sacvs_verify::notify::{MemorySink, NotifyLevel, NullSink};
use sacvs_verify::stages::RunState;
use sacvs_verify::store::{KeyValueStore, MemoryStore, KEY_USER_DATA, KEY_VERIFICATION_RESULT};
use sacvs_verify::types::{FileCandidate, FileStatus, StageTimings, WorkflowConfig};
use sacvs_verify::workflow::VerificationWorkflow;
use sacvs_verify::AppContext;

fn instant_config() -> WorkflowConfig {
    WorkflowConfig {
        timings: StageTimings::instant(),
        ..WorkflowConfig::default()
    }
}

fn workflow_with(store: Arc<MemoryStore>, sink: Arc<MemorySink>) -> VerificationWorkflow {
    VerificationWorkflow::new(AppContext::new(instant_config(), store, sink))
}

fn workflow() -> (VerificationWorkflow, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let ctx = AppContext::new(instant_config(), store.clone(), Arc::new(NullSink));
    (VerificationWorkflow::new(ctx), store)
}

fn candidate(name: &str, size_bytes: u64, mime_type: &str) -> FileCandidate {
    FileCandidate {
        name: name.into(),
        size_bytes,
        mime_type: mime_type.into(),
    }
}

fn assert_run_id_shape(id: &str) {
    let parts: Vec<&str> = id.split('-').collect();
    assert_eq!(parts.len(), 3, "unexpected id shape: {id}");
    assert_eq!(parts[0], "VRF");
    assert_eq!(parts[1], Utc::now().year().to_string());
    assert_eq!(parts[2].len(), 6);
    assert!(parts[2]
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[tokio::test]
async fn full_run_publishes_one_verified_record() {
    let (wf, store) = workflow();
    wf.add_file(candidate("degree.pdf", 2 * 1024 * 1024, "application/pdf"))
        .unwrap();
    wf.add_file(candidate("seal.png", 1024 * 1024, "image/png"))
        .unwrap();

    let run = wf.start().unwrap().wait().await.unwrap();
    assert_run_id_shape(&run.id);

    assert_eq!(wf.state(), RunState::Completed);
    let progress = wf.progress_view();
    assert_eq!(progress.progress_percent, 100);
    assert_eq!(progress.current_stage, None);
    assert!(wf
        .files()
        .iter()
        .all(|f| f.status == FileStatus::Completed));

    let raw = store.get(KEY_VERIFICATION_RESULT).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], run.id);
    assert_eq!(value["status"], "verified");
    let files = value["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f["status"] == "verified"));
}

#[tokio::test]
async fn second_start_is_rejected_without_resetting_progress() {
    let (wf, _store) = workflow();
    wf.add_file(candidate("doc.pdf", 4096, "application/pdf"))
        .unwrap();

    let handle = wf.start().unwrap();
    let before = wf.progress_view();
    assert_eq!(before.state, RunState::Running);

    let err = wf.start().unwrap_err();
    assert!(matches!(err, WorkflowError::AlreadyRunning));
    assert_eq!(wf.progress_view(), before);

    // The armed run is still drivable after the rejected attempt.
    handle.wait().await.unwrap();
    assert_eq!(wf.state(), RunState::Completed);
}

#[tokio::test]
async fn oversize_rejection_leaves_no_trace() {
    let (wf, store) = workflow();
    let err = wf
        .add_file(candidate("scan.pdf", 12 * 1024 * 1024, "application/pdf"))
        .unwrap_err();

    assert!(matches!(err, IntakeError::Oversize { .. }));
    assert_eq!(wf.file_count(), 0);
    assert_eq!(store.get(KEY_VERIFICATION_RESULT), None);
}

#[tokio::test]
async fn start_with_empty_intake_is_rejected() {
    let (wf, _store) = workflow();
    assert!(!wf.can_start());
    let err = wf.start().unwrap_err();
    assert!(matches!(err, WorkflowError::EmptyIntake));
    assert_eq!(wf.state(), RunState::Idle);
}

#[tokio::test]
async fn completed_run_allows_a_fresh_start() {
    let (wf, store) = workflow();
    wf.add_file(candidate("first.pdf", 100, "application/pdf"))
        .unwrap();
    let first = wf.start().unwrap().wait().await.unwrap();

    wf.add_file(candidate("second.pdf", 200, "application/pdf"))
        .unwrap();
    let second = wf.start().unwrap().wait().await.unwrap();
    assert_ne!(first.id, second.id);

    // Last writer wins in the shared slot.
    let raw = store.get(KEY_VERIFICATION_RESULT).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], second.id);
    assert_eq!(value["files"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn published_record_is_decoupled_from_live_intake() {
    let (wf, store) = workflow();
    wf.add_file(candidate("degree.pdf", 2048, "application/pdf"))
        .unwrap();
    let run = wf.start().unwrap().wait().await.unwrap();

    assert!(wf.clear_files());
    assert_eq!(wf.file_count(), 0);

    let raw = store.get(KEY_VERIFICATION_RESULT).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], run.id);
    assert_eq!(value["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn run_embeds_session_identity_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    store.set(
        KEY_USER_DATA,
        r#"{"username":"registrar","institutionCode":"UNIV-042","loginTime":"2026-08-23T10:00:00.000Z"}"#.into(),
    );
    let wf = VerificationWorkflow::new(AppContext::new(
        instant_config(),
        store.clone(),
        Arc::new(NullSink),
    ));
    wf.add_file(candidate("cert.pdf", 512, "application/pdf"))
        .unwrap();
    let run = wf.start().unwrap().wait().await.unwrap();
    assert_eq!(run.user_data.as_ref().unwrap().username, "registrar");

    let raw = store.get(KEY_VERIFICATION_RESULT).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["userData"]["institutionCode"], "UNIV-042");
}

#[tokio::test]
async fn intake_and_run_emit_the_portal_notifications() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let wf = workflow_with(store, sink.clone());

    wf.add_file(candidate("degree.pdf", 2048, "application/pdf"))
        .unwrap();
    wf.add_file(candidate("degree.pdf", 2048, "application/pdf"))
        .unwrap_err();
    wf.start().unwrap().wait().await.unwrap();

    let notifications = sink.drain();
    assert_eq!(notifications.len(), 3);

    assert_eq!(
        notifications[0].message,
        "File \"degree.pdf\" added successfully"
    );
    assert_eq!(notifications[0].level, NotifyLevel::Success);
    assert_eq!(notifications[0].duration_ms, 3000);

    assert_eq!(notifications[1].message, "File already uploaded");
    assert_eq!(notifications[1].level, NotifyLevel::Warning);

    assert_eq!(
        notifications[2].message,
        "Verification completed successfully! Redirecting to results..."
    );
    assert_eq!(notifications[2].level, NotifyLevel::Success);
}

#[tokio::test]
async fn remove_and_clear_feedback_distinguishes_empty_list() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let wf = workflow_with(store, sink.clone());

    assert!(!wf.clear_files());
    let entry = wf
        .add_file(candidate("doc.pdf", 64, "application/pdf"))
        .unwrap();
    assert!(wf.remove_file(entry.id));
    assert!(!wf.remove_file(entry.id));

    let messages = sink.messages();
    assert_eq!(
        messages,
        vec![
            "No files to clear".to_string(),
            "File \"doc.pdf\" added successfully".to_string(),
            "File removed".to_string(),
        ]
    );
}

#[tokio::test]
async fn stage_board_reports_progress_through_the_view() {
    let (wf, _store) = workflow();
    wf.add_file(candidate("doc.pdf", 64, "application/pdf"))
        .unwrap();

    let idle = wf.progress_view();
    assert_eq!(idle.state, RunState::Idle);
    assert_eq!(idle.progress_percent, 0);
    assert_eq!(idle.current_stage, None);

    let handle = wf.start().unwrap();
    let armed = wf.progress_view();
    assert_eq!(armed.state, RunState::Running);
    assert_eq!(armed.current_stage, Some("Document Uploaded"));
    assert_eq!(armed.stages.len(), 4);

    handle.wait().await.unwrap();
    let done = wf.progress_view();
    assert_eq!(done.progress_percent, 100);
    assert!(done
        .stages
        .iter()
        .all(|s| s.status == sacvs_verify::types::StageStatus::Completed));
}
