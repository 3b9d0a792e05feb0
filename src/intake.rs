/// File intake — admission policy and the ordered candidate list.
///
/// Checks run in a fixed, documented order: type, then size, then count;
/// the duplicate check on `(name, size)` runs only for an otherwise valid
/// candidate. Exactly one rejection reason per call.

use uuid::Uuid;

use crate::error::IntakeError;
use crate::types::{FileCandidate, FileEntry, FileStatus, WorkflowConfig};

#[derive(Debug)]
pub struct FileIntake {
    entries: Vec<FileEntry>,
    max_file_size_bytes: u64,
    max_files: usize,
    allowed_mime_types: Vec<String>,
}

impl FileIntake {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            entries: Vec::new(),
            max_file_size_bytes: config.max_file_size_bytes,
            max_files: config.max_files,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    /// Admission check only; never mutates the list.
    pub fn validate(&self, candidate: &FileCandidate) -> Result<(), IntakeError> {
        if !self
            .allowed_mime_types
            .iter()
            .any(|t| t == &candidate.mime_type)
        {
            return Err(IntakeError::UnsupportedType {
                mime_type: candidate.mime_type.clone(),
            });
        }

        if candidate.size_bytes > self.max_file_size_bytes {
            return Err(IntakeError::Oversize {
                size_bytes: candidate.size_bytes,
                max_bytes: self.max_file_size_bytes,
            });
        }

        if self.entries.len() >= self.max_files {
            return Err(IntakeError::TooManyFiles {
                max: self.max_files,
            });
        }

        Ok(())
    }

    /// Validates, rejects duplicates by `(name, size)`, then appends the
    /// entry as `pending`. Insertion order is preserved.
    pub fn add(&mut self, candidate: FileCandidate) -> Result<FileEntry, IntakeError> {
        self.validate(&candidate)?;

        let duplicate = self
            .entries
            .iter()
            .any(|e| e.name == candidate.name && e.size_bytes == candidate.size_bytes);
        if duplicate {
            return Err(IntakeError::Duplicate);
        }

        let entry = FileEntry {
            id: Uuid::new_v4(),
            name: candidate.name,
            size_bytes: candidate.size_bytes,
            mime_type: candidate.mime_type,
            status: FileStatus::Pending,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Returns true if an entry was removed; an absent id is a no-op.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Returns true if the list held anything to clear.
    pub fn clear(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        true
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub(crate) fn set_status(&mut self, id: Uuid, status: FileStatus) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.status = status;
        }
    }

    pub(crate) fn set_all_statuses(&mut self, status: FileStatus) {
        for entry in &mut self.entries {
            entry.status = status;
        }
    }
}
