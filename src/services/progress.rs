//! Progress tracker for a single import task.
//!
//! Emits coarse stage transitions for most of the pipeline and fractional
//! percentages for the geocoding stage, where locations are processed one by
//! one. Percentages within one task never decrease.

use uuid::Uuid;

use crate::models::{ImportProgressKind, ImportProgressUpdateEvent, TaskStatus};
use crate::services::EventBroadcaster;

/// Tracks and broadcasts progress for one import task.
pub struct ImportProgressTracker {
    task_id: Uuid,
    broadcaster: EventBroadcaster,
    last_progress: f64,
}

impl ImportProgressTracker {
    pub fn new(task_id: Uuid, broadcaster: EventBroadcaster) -> Self {
        Self {
            task_id,
            broadcaster,
            last_progress: 0.0,
        }
    }

    /// Emit a coarse stage transition (no fractional progress).
    ///
    /// Terminal kinds go through `finished` or `failed` so the broadcast
    /// status matches the task's stored state.
    pub fn stage(&mut self, kind: ImportProgressKind) {
        debug_assert!(
            !matches!(
                kind,
                ImportProgressKind::Finished | ImportProgressKind::Failed
            ),
            "terminal progress kinds must use finished() or failed()"
        );
        let progress = self.last_progress;
        self.emit(kind, TaskStatus::Processing, progress);
    }

    /// Emit fractional progress for the geocoding stage.
    ///
    /// `processed` out of `total` locations; the percentage is clamped to
    /// [0, 100] and never decreases within this task's lifetime.
    pub fn geocoding_progress(&mut self, processed: usize, total: usize) {
        let pct = if total == 0 {
            100.0
        } else {
            (processed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        self.emit(ImportProgressKind::Geocoding, TaskStatus::Processing, pct);
    }

    /// Emit the terminal finished event.
    pub fn finished(&mut self) {
        self.emit(ImportProgressKind::Finished, TaskStatus::Completed, 100.0);
    }

    /// Emit the terminal failed event. Reachable from any stage.
    pub fn failed(&mut self) {
        let progress = self.last_progress;
        self.emit(ImportProgressKind::Failed, TaskStatus::Failed, progress);
    }

    fn emit(&mut self, kind: ImportProgressKind, status: TaskStatus, progress: f64) {
        // Monotonic within a task: never report less than already reported
        let progress = progress.max(self.last_progress);
        self.last_progress = progress;
        self.broadcaster.send(ImportProgressUpdateEvent::new(
            self.task_id,
            kind,
            status,
            progress,
        ));
    }
}
