//! Task business logic.
//!
//! Every successful mutation re-synchronizes the owning event's progress. The
//! synchronizer is best effort, so a task save never fails because of it.

use crate::{
    core::progress::sync_event_progress,
    entities::{Event, Priority, Task, TaskStatus, task},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{NullOrdering, Order},
};
use tracing::info;

/// Fields accepted when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Event the task belongs to
    pub event_id: i64,
    /// Title, required
    pub title: String,
    /// Details
    pub description: Option<String>,
    /// Assigned profile
    pub assignee_id: Option<i64>,
    /// Due date
    pub due_at: Option<DateTime<Utc>>,
    /// Defaults to [`TaskStatus::Pending`]
    pub status: Option<TaskStatus>,
    /// Defaults to [`Priority::Medium`]
    pub priority: Option<Priority>,
    /// Team doing the work
    pub team_id: Option<i64>,
}

impl NewTask {
    /// A pending, medium-priority task with only a title.
    #[must_use]
    pub fn new(event_id: i64, title: impl Into<String>) -> Self {
        Self {
            event_id,
            title: title.into(),
            description: None,
            assignee_id: None,
            due_at: None,
            status: None,
            priority: None,
            team_id: None,
        }
    }
}

fn completion_date(status: TaskStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match status {
        TaskStatus::Done => Some(now),
        TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Cancelled => None,
    }
}

/// Creates a task and re-synchronizes its event.
pub async fn create_task(db: &DatabaseConnection, new: NewTask) -> Result<task::Model> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(Error::validation("Task title cannot be empty"));
    }

    Event::find_by_id(new.event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: new.event_id })?;

    let now = Utc::now();
    let status = new.status.unwrap_or(TaskStatus::Pending);
    let task = task::ActiveModel {
        event_id: Set(new.event_id),
        title: Set(title.to_string()),
        description: Set(super::non_blank(new.description)),
        assignee_id: Set(new.assignee_id),
        due_at: Set(new.due_at),
        status: Set(status),
        priority: Set(new.priority.unwrap_or(Priority::Medium)),
        completed_at: Set(completion_date(status, now)),
        team_id: Set(new.team_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = task.insert(db).await?;
    info!("Created task {} for event {}", created.id, created.event_id);

    let _ = sync_event_progress(db, Some(created.event_id)).await;
    Ok(created)
}

/// Changes a task's status and re-synchronizes its event.
///
/// Moving to `concluida` stamps the completion date; any other status clears it.
pub async fn update_task_status(
    db: &DatabaseConnection,
    task_id: i64,
    status: TaskStatus,
) -> Result<task::Model> {
    let task = Task::find_by_id(task_id)
        .one(db)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;

    let now = Utc::now();
    let mut task: task::ActiveModel = task.into();
    task.status = Set(status);
    task.completed_at = Set(completion_date(status, now));
    task.updated_at = Set(now);
    let updated = task.update(db).await?;

    let _ = sync_event_progress(db, Some(updated.event_id)).await;
    Ok(updated)
}

/// Deletes a task and re-synchronizes its event.
pub async fn delete_task(db: &DatabaseConnection, task_id: i64) -> Result<()> {
    let task = Task::find_by_id(task_id)
        .one(db)
        .await?
        .ok_or(Error::TaskNotFound { id: task_id })?;
    let event_id = task.event_id;

    task.delete(db).await?;
    info!("Deleted task {} from event {}", task_id, event_id);

    let _ = sync_event_progress(db, Some(event_id)).await;
    Ok(())
}

/// Tasks of an event, soonest due first; undated tasks lead.
pub async fn get_tasks_for_event(db: &DatabaseConnection, event_id: i64) -> Result<Vec<task::Model>> {
    Task::find()
        .filter(task::Column::EventId.eq(event_id))
        .order_by_with_nulls(task::Column::DueAt, Order::Asc, NullOrdering::First)
        .order_by_asc(task::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
