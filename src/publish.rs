/// Result publisher — synthesizes the VerificationRun record on completion
/// and writes it to the shared store for the results view.

use std::sync::Arc;

use chrono::{Datelike, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::PublishError;
use crate::store::{KeyValueStore, KEY_VERIFICATION_RESULT};
use crate::types::{FileEntry, FileSnapshot, UserData, VerdictStatus, VerificationRun};

const ID_PREFIX: &str = "VRF";
const ID_SUFFIX_LEN: usize = 6;

pub struct ResultPublisher {
    store: Arc<dyn KeyValueStore>,
}

impl ResultPublisher {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Builds the run record from the completed entries and writes it under
    /// `verificationResult`, overwriting any prior value. Called at most
    /// once per completed run.
    pub fn publish(
        &self,
        entries: &[FileEntry],
        user_data: Option<UserData>,
    ) -> Result<VerificationRun, PublishError> {
        let run = VerificationRun {
            id: new_run_id(),
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            files: entries.iter().map(snapshot).collect(),
            overall_status: VerdictStatus::Verified,
            user_data,
        };

        let serialized = serde_json::to_string(&run)?;
        self.store.set(KEY_VERIFICATION_RESULT, serialized);
        tracing::info!(run_id = %run.id, files = run.files.len(), "verification result published");
        Ok(run)
    }
}

fn snapshot(entry: &FileEntry) -> FileSnapshot {
    FileSnapshot {
        name: entry.name.clone(),
        size_bytes: entry.size_bytes,
        mime_type: entry.mime_type.clone(),
        status: VerdictStatus::Verified,
    }
}

/// `VRF-<year>-<6 base36 chars>`, e.g. `VRF-2026-K3XR9A`.
pub fn new_run_id() -> String {
    format!(
        "{}-{}-{}",
        ID_PREFIX,
        Utc::now().year(),
        base36_suffix(ID_SUFFIX_LEN)
    )
}

fn base36_suffix(len: usize) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}
