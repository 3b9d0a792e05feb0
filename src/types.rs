use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stages::{RunState, Stage};

/// A raw file selection handed in by the UI (drag-drop or picker).
/// Carries only the metadata the intake policy needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCandidate {
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
}

impl FileStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Verified,
    Warning,
    Error,
}

impl VerdictStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Session identity written by the login page under the `userData` key.
/// Read-only from this core's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub username: String,
    #[serde(rename = "institutionCode")]
    pub institution_code: String,
    #[serde(rename = "loginTime", default)]
    pub login_time: Option<String>,
}

/// Per-file snapshot embedded in a published run. Field names match the
/// JSON the results view reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub status: VerdictStatus,
}

/// The record published once per completed run. Immutable after the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRun {
    pub id: String,
    #[serde(rename = "timestamp")]
    pub started_at: String,
    pub files: Vec<FileSnapshot>,
    #[serde(rename = "status")]
    pub overall_status: VerdictStatus,
    #[serde(rename = "userData")]
    pub user_data: Option<UserData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub name: &'static str,
    pub status: StageStatus,
}

/// Run-level projection for the UI: progress bar, current step, step states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    pub state: RunState,
    pub progress_percent: u8,
    pub current_stage: Option<&'static str>,
    pub stages: Vec<StageView>,
}

/// Simulated latencies for a run. Defaults mirror the portal's original
/// animation timings; tests inject `instant()`.
#[derive(Debug, Clone)]
pub struct StageTimings {
    pub stage_waits: [Duration; Stage::COUNT],
    pub file_pacing: Duration,
    pub completion: Duration,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            stage_waits: [
                Duration::ZERO,
                Duration::from_millis(2000),
                Duration::from_millis(4000),
                Duration::from_millis(6000),
            ],
            file_pacing: Duration::from_millis(1000),
            completion: Duration::from_millis(2000),
        }
    }
}

impl StageTimings {
    /// Zero-delay clock for synchronous-style tests.
    pub const fn instant() -> Self {
        Self {
            stage_waits: [Duration::ZERO; Stage::COUNT],
            file_pacing: Duration::ZERO,
            completion: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub max_file_size_bytes: u64,
    pub max_files: usize,
    pub allowed_mime_types: Vec<String>,
    pub timings: StageTimings,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            max_files: 5,
            allowed_mime_types: vec![
                "application/pdf".into(),
                "image/png".into(),
                "image/jpeg".into(),
                "image/jpg".into(),
            ],
            timings: StageTimings::default(),
        }
    }
}
