/// Verification stage sequence — fixed, four steps, walked in order.

use serde::Serialize;

use crate::types::{StageStatus, StageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    DocumentUploaded,
    ScanningDocument,
    BlockchainVerification,
    GeneratingReport,
}

impl Stage {
    pub const COUNT: usize = 4;

    pub const SEQUENCE: [Stage; Self::COUNT] = [
        Stage::DocumentUploaded,
        Stage::ScanningDocument,
        Stage::BlockchainVerification,
        Stage::GeneratingReport,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::DocumentUploaded => "Document Uploaded",
            Self::ScanningDocument => "Scanning Document",
            Self::BlockchainVerification => "Blockchain Verification",
            Self::GeneratingReport => "Generating Report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Tracks per-stage status and the derived progress percentage for one run.
/// The first stage is active as soon as the board is armed; each `advance`
/// completes the active stage and activates the next.
#[derive(Debug, Clone)]
pub struct StageBoard {
    statuses: [StageStatus; Stage::COUNT],
}

impl StageBoard {
    /// All stages pending; nothing in flight yet.
    pub fn idle() -> Self {
        Self {
            statuses: [StageStatus::Pending; Stage::COUNT],
        }
    }

    /// Fresh board for a starting run, first stage active.
    pub fn armed() -> Self {
        let mut board = Self::idle();
        board.statuses[0] = StageStatus::Active;
        board
    }

    /// Completes the currently active stage and activates the next, if any.
    /// Returns the stage that was completed, or `None` when the walk is done.
    pub fn advance(&mut self) -> Option<Stage> {
        let current = self.active_index()?;
        self.statuses[current] = StageStatus::Completed;
        if let Some(next) = self.statuses.get_mut(current + 1) {
            *next = StageStatus::Active;
        }
        Some(Stage::SEQUENCE[current])
    }

    pub fn current(&self) -> Option<Stage> {
        self.active_index().map(|i| Stage::SEQUENCE[i])
    }

    pub fn completed_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == StageStatus::Completed)
            .count()
    }

    pub fn progress_percent(&self) -> u8 {
        (self.completed_count() * 100 / Stage::COUNT) as u8
    }

    pub fn is_finished(&self) -> bool {
        self.completed_count() == Stage::COUNT
    }

    pub fn views(&self) -> Vec<StageView> {
        Stage::SEQUENCE
            .iter()
            .zip(self.statuses.iter())
            .map(|(stage, status)| StageView {
                name: stage.label(),
                status: *status,
            })
            .collect()
    }

    fn active_index(&self) -> Option<usize> {
        self.statuses.iter().position(|s| *s == StageStatus::Active)
    }
}
