//! Database queries for import tasks.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::entity::import_task::{self as task, ActiveModel, Column, Entity as ImportTask};
use crate::error::{AppError, AppResult};
use crate::models::{ImportTaskError, TaskStatus};

use super::DbPool;

impl DbPool {
    /// Insert a new import task in the queued state.
    pub async fn insert_task(
        &self,
        id: Uuid,
        file_name: &str,
        file_path: &str,
    ) -> AppResult<task::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(id),
            status: Set(TaskStatus::Queued.as_str().to_string()),
            file_name: Set(file_name.to_string()),
            file_path: Set(file_path.to_string()),
            errors: Set(None),
            logs: Set(None),
            error_message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert task: {}", e)))?;

        Ok(result)
    }

    /// Get a task by ID.
    pub async fn get_task(&self, id: Uuid) -> AppResult<Option<task::Model>> {
        let result = ImportTask::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get task: {}", e)))?;

        Ok(result)
    }

    /// List tasks ordered by creation time, newest first.
    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<task::Model>, u64)> {
        let mut query = ImportTask::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let total = query
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count tasks: {}", e)))?;

        let tasks = query
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list tasks: {}", e)))?;

        Ok((tasks, total))
    }

    /// Transition a task from one status to another.
    ///
    /// The update is conditional on the current status, which is what keeps
    /// the queued -> processing -> terminal progression monotonic: a task in
    /// a terminal state never matches the `from` filter again. Returns false
    /// when the task was not in the expected state.
    pub async fn transition_task(
        &self,
        id: Uuid,
        from: TaskStatus,
        to: TaskStatus,
    ) -> AppResult<bool> {
        let result = ImportTask::update_many()
            .col_expr(Column::Status, Expr::value(to.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(from.as_str()))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to transition task: {}", e)))?;

        Ok(result.rows_affected == 1)
    }

    /// Mark a task failed from any non-terminal state and record the error.
    pub async fn fail_task(&self, id: Uuid, message: &str) -> AppResult<bool> {
        let result = ImportTask::update_many()
            .col_expr(Column::Status, Expr::value(TaskStatus::Failed.as_str()))
            .col_expr(Column::ErrorMessage, Expr::value(message))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in([
                TaskStatus::Queued.as_str(),
                TaskStatus::Processing.as_str(),
            ]))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to fail task: {}", e)))?;

        Ok(result.rows_affected == 1)
    }

    /// Store row-level validation errors on a task.
    pub async fn set_task_errors(&self, id: Uuid, errors: &[ImportTaskError]) -> AppResult<()> {
        let value = serde_json::to_value(errors)?;

        ImportTask::update_many()
            .col_expr(Column::Errors, Expr::value(value))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to set task errors: {}", e)))?;

        Ok(())
    }

    /// Append pipeline warnings to a task's log.
    pub async fn append_task_logs(&self, id: Uuid, new_logs: &[String]) -> AppResult<()> {
        let task = self
            .get_task(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

        let mut logs: Vec<String> = task
            .logs
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        logs.extend_from_slice(new_logs);

        ImportTask::update_many()
            .col_expr(Column::Logs, Expr::value(serde_json::to_value(&logs)?))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to append task logs: {}", e)))?;

        Ok(())
    }

    /// Delete a task. Returns false when no task matched.
    pub async fn delete_task(&self, id: Uuid) -> AppResult<bool> {
        let result = ImportTask::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete task: {}", e)))?;

        Ok(result.rows_affected == 1)
    }
}
