use super::types::{NewTask, Task, TaskPatch, TaskStatus};
use crate::error::StoreError;
use crate::suggest::Priority;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use std::future::Future;
use std::pin::Pin;

/// Async task persistence contract.
///
/// Listing returns tasks assigned to the caller. Single-task operations see
/// tasks the caller is assigned to or created; anything else reads as absent.
pub trait TaskStore: Send + Sync {
    fn list_for_user<'a>(
        &'a self,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Task>, StoreError>> + Send + 'a>>;

    fn get_visible<'a>(
        &'a self,
        id: i64,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Task>, StoreError>> + Send + 'a>>;

    fn create<'a>(
        &'a self,
        task: NewTask,
    ) -> Pin<Box<dyn Future<Output = Result<Task, StoreError>> + Send + 'a>>;

    /// Returns `None` when the task is not visible to `user_id`.
    fn update<'a>(
        &'a self,
        id: i64,
        user_id: i64,
        patch: TaskPatch,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Task>, StoreError>> + Send + 'a>>;

    /// Returns `false` when the task is not visible to `user_id`.
    fn soft_delete<'a>(
        &'a self,
        id: i64,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StoreError>> + Send + 'a>>;
}

/// SQLite-backed task store. Expects the schema from [`crate::db::connect`].
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, \
assigned_to, created_by, created_at, updated_at";

fn map_task_row(row: &SqliteRow) -> Result<Task, StoreError> {
    let status_raw: String = row.try_get("status")?;
    let priority_raw: String = row.try_get("priority")?;

    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: TaskStatus::parse(&status_raw)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown task status: {status_raw}")))?,
        priority: Priority::parse(&priority_raw).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown task priority: {priority_raw}"))
        })?,
        due_date: row.try_get("due_date")?,
        assigned_to: row.try_get("assigned_to")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl SqliteTaskStore {
    async fn fetch_visible(&self, id: i64, user_id: i64) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS}
             FROM tasks
             WHERE id = $1
               AND (assigned_to = $2 OR created_by = $2)
               AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_task_row(&r)).transpose()
    }
}

impl TaskStore for SqliteTaskStore {
    fn list_for_user<'a>(
        &'a self,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Task>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {TASK_COLUMNS}
                 FROM tasks
                 WHERE assigned_to = $1 AND deleted_at IS NULL
                 ORDER BY id ASC"
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

            rows.iter().map(map_task_row).collect()
        })
    }

    fn get_visible<'a>(
        &'a self,
        id: i64,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Task>, StoreError>> + Send + 'a>> {
        Box::pin(self.fetch_visible(id, user_id))
    }

    fn create<'a>(
        &'a self,
        task: NewTask,
    ) -> Pin<Box<dyn Future<Output = Result<Task, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let timestamp = Utc::now().to_rfc3339();
            let done = sqlx::query(
                "INSERT INTO tasks (title, description, status, priority, due_date,
                                    assigned_to, created_by, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
            )
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(&task.due_date)
            .bind(task.assigned_to)
            .bind(task.created_by)
            .bind(&timestamp)
            .execute(&self.pool)
            .await?;

            Ok(Task {
                id: done.last_insert_rowid(),
                title: task.title,
                description: task.description,
                status: task.status,
                priority: task.priority,
                due_date: task.due_date,
                assigned_to: task.assigned_to,
                created_by: task.created_by,
                created_at: timestamp.clone(),
                updated_at: timestamp,
            })
        })
    }

    fn update<'a>(
        &'a self,
        id: i64,
        user_id: i64,
        patch: TaskPatch,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Task>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let Some(mut task) = self.fetch_visible(id, user_id).await? else {
                return Ok(None);
            };
            patch.apply(&mut task);
            task.updated_at = Utc::now().to_rfc3339();

            sqlx::query(
                "UPDATE tasks
                 SET title = $1, description = $2, status = $3, priority = $4,
                     due_date = $5, assigned_to = $6, updated_at = $7
                 WHERE id = $8 AND deleted_at IS NULL",
            )
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(&task.due_date)
            .bind(task.assigned_to)
            .bind(&task.updated_at)
            .bind(task.id)
            .execute(&self.pool)
            .await?;

            Ok(Some(task))
        })
    }

    fn soft_delete<'a>(
        &'a self,
        id: i64,
        user_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let timestamp = Utc::now().to_rfc3339();
            let done = sqlx::query(
                "UPDATE tasks
                 SET deleted_at = $1, updated_at = $1
                 WHERE id = $2
                   AND (assigned_to = $3 OR created_by = $3)
                   AND deleted_at IS NULL",
            )
            .bind(&timestamp)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            Ok(done.rows_affected() > 0)
        })
    }
}
