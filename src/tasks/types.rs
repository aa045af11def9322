use crate::error::TaskInputError;
use crate::suggest::Priority;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Case-insensitive. Accepts `in-progress` as a spelling of `in_progress`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "todo" => Some(Self::Todo),
            "in_progress" | "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub assigned_to: i64,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated task ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub assigned_to: i64,
    pub created_by: i64,
}

/// Validated partial update. `None` leaves the column as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub assigned_to: Option<i64>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
    }
}

/// Request body for task create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<i64>,
}

impl TaskInput {
    /// Build an insertable task. An absent or zero assignee means the creator.
    pub fn into_new_task(self, creator: i64) -> Result<NewTask, TaskInputError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TaskInputError::MissingTitle)?
            .to_string();

        Ok(NewTask {
            title,
            description: self.description.unwrap_or_default(),
            status: parse_status(self.status.as_deref())?.unwrap_or_default(),
            priority: parse_priority(self.priority.as_deref())?.unwrap_or_default(),
            due_date: parse_due_date(self.due_date.as_deref())?,
            assigned_to: self.assigned_to.filter(|id| *id > 0).unwrap_or(creator),
            created_by: creator,
        })
    }

    /// Build a partial update. Empty strings count as absent, except for the
    /// description, which may be cleared.
    pub fn into_patch(self) -> Result<TaskPatch, TaskInputError> {
        let title = match self.title.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(title) => Some(title.to_string()),
        };

        Ok(TaskPatch {
            title,
            description: self.description,
            status: parse_status(self.status.as_deref())?,
            priority: parse_priority(self.priority.as_deref())?,
            due_date: parse_due_date(self.due_date.as_deref())?,
            assigned_to: self.assigned_to.filter(|id| *id > 0),
        })
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, TaskInputError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => TaskStatus::parse(value)
            .map(Some)
            .ok_or_else(|| TaskInputError::InvalidStatus(value.to_string())),
    }
}

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, TaskInputError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => Priority::parse(value)
            .map(Some)
            .ok_or_else(|| TaskInputError::InvalidPriority(value.to_string())),
    }
}

/// Normalize to an RFC 3339 UTC timestamp. A bare date means midnight UTC.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<String>, TaskInputError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(
            timestamp
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Some(
            midnight
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    Err(TaskInputError::InvalidDueDate(value.to_string()))
}
