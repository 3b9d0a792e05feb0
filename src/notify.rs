/// Notification sink — the generic user-feedback channel.
///
/// The core never renders anything itself; every user-visible message goes
/// through this trait. A host UI maps it onto toasts; tests buffer it.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

pub const DEFAULT_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotifyLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub level: NotifyLevel,
    pub duration_ms: u64,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotifyLevel) -> Self {
        Self {
            message: message.into(),
            level,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn with_duration(message: impl Into<String>, level: NotifyLevel, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration_ms,
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Discards everything. Default sink for hosts that wire feedback elsewhere.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Buffers notifications in order. Used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *buffer)
    }

    pub fn messages(&self) -> Vec<String> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
