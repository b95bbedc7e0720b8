//! Progress events published over the WebSocket channel.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::TaskStatus;

/// Processing stage of an import task.
///
/// Stages are strictly ordered; `Failed` is a parallel terminal stage
/// reachable from any of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportProgressKind {
    ImportingData,
    Geocoding,
    CalculatingImpact,
    Finished,
    Failed,
}

impl ImportProgressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImportingData => "IMPORTING_DATA",
            Self::Geocoding => "GEOCODING",
            Self::CalculatingImpact => "CALCULATING_IMPACT",
            Self::Finished => "FINISHED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for ImportProgressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress update broadcast to connected dashboard clients.
///
/// Fire-and-forget: there is no acknowledgment and no replay buffer, so a
/// late subscriber misses events emitted before it connected.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgressUpdateEvent {
    pub task_id: Uuid,
    pub kind: ImportProgressKind,
    pub status: TaskStatus,
    /// Percentage in [0, 100]. Fractional values only occur during the
    /// geocoding stage; other stages report coarse transitions.
    pub progress: f64,
}

impl ImportProgressUpdateEvent {
    pub fn new(task_id: Uuid, kind: ImportProgressKind, status: TaskStatus, progress: f64) -> Self {
        Self {
            task_id,
            kind,
            status,
            progress,
        }
    }
}
