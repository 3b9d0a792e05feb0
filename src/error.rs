use thiserror::Error;

use crate::notify::NotifyLevel;

/// Admission-policy rejections. `Display` is the exact message shown to the
/// user; no intake state changes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Only PDF, PNG, and JPG files are allowed")]
    UnsupportedType { mime_type: String },

    #[error("File size must be less than 10MB")]
    Oversize { size_bytes: u64, max_bytes: u64 },

    #[error("Maximum {max} files allowed per verification")]
    TooManyFiles { max: usize },

    #[error("File already uploaded")]
    Duplicate,
}

impl IntakeError {
    /// Severity the portal attaches to the rejection notification.
    pub const fn notify_level(&self) -> NotifyLevel {
        match self {
            Self::Duplicate => NotifyLevel::Warning,
            _ => NotifyLevel::Error,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Please upload files first")]
    EmptyIntake,

    #[error("Verification already in progress")]
    AlreadyRunning,

    #[error("Verification failed. Please try again.")]
    RunFailed(#[source] PublishError),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize verification result: {0}")]
    Serialize(#[from] serde_json::Error),
}
