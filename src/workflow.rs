/// Verification workflow — orchestrates intake, the staged run, and the
/// result handoff.
///
/// One run at a time: `start` gates on the run state and hands back a
/// `RunHandle`; the caller awaits it to drive the run cooperatively. All
/// simulated latency suspends on the tokio timer, so dropping the handle
/// abandons the run and cancels every pending delay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::sleep;
use uuid::Uuid;

use crate::error::{IntakeError, WorkflowError};
use crate::intake::FileIntake;
use crate::notify::{Notification, NotifyLevel};
use crate::publish::ResultPublisher;
use crate::stages::{RunState, Stage, StageBoard};
use crate::types::{FileCandidate, FileEntry, FileStatus, RunProgress, VerificationRun};
use crate::AppContext;

#[derive(Clone)]
pub struct VerificationWorkflow {
    ctx: AppContext,
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    intake: FileIntake,
    state: RunState,
    board: StageBoard,
}

impl VerificationWorkflow {
    pub fn new(ctx: AppContext) -> Self {
        let intake = FileIntake::new(&ctx.config);
        Self {
            ctx,
            inner: Arc::new(Mutex::new(Inner {
                intake,
                state: RunState::Idle,
                board: StageBoard::idle(),
            })),
        }
    }

    pub fn add_file(&self, candidate: FileCandidate) -> Result<FileEntry, IntakeError> {
        let result = self.lock().intake.add(candidate);
        match result {
            Ok(entry) => {
                self.ctx.notify(Notification::with_duration(
                    format!("File \"{}\" added successfully", entry.name),
                    NotifyLevel::Success,
                    3000,
                ));
                Ok(entry)
            }
            Err(err) => {
                tracing::warn!(%err, "file rejected at intake");
                self.ctx
                    .notify(Notification::new(err.to_string(), err.notify_level()));
                Err(err)
            }
        }
    }

    pub fn remove_file(&self, id: Uuid) -> bool {
        let removed = self.lock().intake.remove(id);
        if removed {
            self.ctx.notify(Notification::with_duration(
                "File removed",
                NotifyLevel::Info,
                3000,
            ));
        }
        removed
    }

    pub fn clear_files(&self) -> bool {
        let cleared = self.lock().intake.clear();
        let notification = if cleared {
            Notification::with_duration("All files cleared", NotifyLevel::Success, 3000)
        } else {
            Notification::with_duration("No files to clear", NotifyLevel::Info, 3000)
        };
        self.ctx.notify(notification);
        cleared
    }

    pub fn files(&self) -> Vec<FileEntry> {
        self.lock().intake.entries().to_vec()
    }

    pub fn file_count(&self) -> usize {
        self.lock().intake.count()
    }

    pub fn state(&self) -> RunState {
        self.lock().state
    }

    /// Submission gate the UI binds its verify control to.
    pub fn can_start(&self) -> bool {
        let inner = self.lock();
        inner.intake.count() > 0 && inner.state != RunState::Running
    }

    pub fn progress_view(&self) -> RunProgress {
        let inner = self.lock();
        RunProgress {
            state: inner.state,
            progress_percent: inner.board.progress_percent(),
            current_stage: inner.board.current().map(Stage::label),
            stages: inner.board.views(),
        }
    }

    /// Gates and arms a fresh run. The returned handle must be awaited to
    /// make progress; a second `start` while the run is live fails without
    /// touching the armed board.
    pub fn start(&self) -> Result<RunHandle, WorkflowError> {
        {
            let mut inner = self.lock();
            if inner.intake.count() == 0 {
                drop(inner);
                self.ctx.notify(Notification::new(
                    WorkflowError::EmptyIntake.to_string(),
                    NotifyLevel::Warning,
                ));
                return Err(WorkflowError::EmptyIntake);
            }
            if inner.state == RunState::Running {
                drop(inner);
                self.ctx.notify(Notification::new(
                    WorkflowError::AlreadyRunning.to_string(),
                    NotifyLevel::Warning,
                ));
                return Err(WorkflowError::AlreadyRunning);
            }
            inner.state = RunState::Running;
            inner.board = StageBoard::armed();
            tracing::info!(files = inner.intake.count(), "verification run started");
        }
        Ok(RunHandle {
            workflow: self.clone(),
        })
    }

    async fn drive(&self) -> Result<VerificationRun, WorkflowError> {
        let timings = self.ctx.config.timings.clone();

        // Stagger each entry into `processing`, in intake order.
        let ids = self.lock().intake.ids();
        for id in ids {
            self.lock().intake.set_status(id, FileStatus::Processing);
            sleep(timings.file_pacing).await;
        }

        for wait in timings.stage_waits {
            sleep(wait).await;
            let mut inner = self.lock();
            if let Some(stage) = inner.board.advance() {
                tracing::debug!(
                    stage = stage.label(),
                    percent = inner.board.progress_percent(),
                    "stage completed"
                );
            }
        }

        sleep(timings.completion).await;

        let entries = {
            let mut inner = self.lock();
            inner.intake.set_all_statuses(FileStatus::Completed);
            inner.intake.entries().to_vec()
        };

        let publisher = ResultPublisher::new(self.ctx.store.clone());
        let run = publisher
            .publish(&entries, self.ctx.current_user())
            .map_err(WorkflowError::RunFailed)?;

        self.lock().state = RunState::Completed;
        self.ctx.notify(Notification::with_duration(
            "Verification completed successfully! Redirecting to results...",
            NotifyLevel::Success,
            3000,
        ));
        Ok(run)
    }

    fn fail_run(&self) {
        // File statuses stay where the run left them; only the gate resets.
        self.lock().state = RunState::Failed;
        self.ctx.notify(Notification::new(
            "Verification failed. Please try again.",
            NotifyLevel::Error,
        ));
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Live handle to an armed run. Await `wait` to drive it to completion;
/// dropping the handle abandons the run with its pending delays cancelled.
pub struct RunHandle {
    workflow: VerificationWorkflow,
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle").finish_non_exhaustive()
    }
}

impl RunHandle {
    pub async fn wait(self) -> Result<VerificationRun, WorkflowError> {
        match self.workflow.drive().await {
            Ok(run) => Ok(run),
            Err(err) => {
                tracing::error!(%err, "verification run failed");
                self.workflow.fail_run();
                Err(err)
            }
        }
    }
}
