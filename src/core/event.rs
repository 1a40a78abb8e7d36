//! Event business logic - creation, lookup, edits and removal.
//!
//! Any save that leaves an event in `aguardando_aprovacao` runs the approval request
//! guard, whether the stage was reached by the synchronizer or by hand.

use crate::{
    core::approval::ensure_approval_request,
    entities::{
        Approval, BudgetItem, Event, EventStatus, Priority, Task, approval, budget_item, event,
        task,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Fields accepted when registering an event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    /// Title, required
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Free-form kind
    pub kind: Option<String>,
    /// Venue
    pub venue: Option<String>,
    /// Start
    pub starts_at: Option<DateTime<Utc>>,
    /// End, not before the start
    pub ends_at: Option<DateTime<Utc>>,
    /// Defaults to [`Priority::Medium`]
    pub priority: Option<Priority>,
    /// Owning department
    pub department_id: Option<i64>,
    /// Owning team
    pub team_id: Option<i64>,
    /// Responsible profile
    pub owner_id: Option<i64>,
    /// Requesting profile
    pub requester_id: Option<i64>,
    /// Forecast budget
    pub planned_budget: Option<f64>,
    /// Expected attendance
    pub expected_attendees: Option<i32>,
    /// Notes
    pub notes: Option<String>,
}

/// Edits applied by [`update_event`]. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    /// New title, must not be blank
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New kind
    pub kind: Option<String>,
    /// New venue
    pub venue: Option<String>,
    /// New start
    pub starts_at: Option<DateTime<Utc>>,
    /// New end
    pub ends_at: Option<DateTime<Utc>>,
    /// New stage, any stage may be chosen
    pub status: Option<EventStatus>,
    /// New priority
    pub priority: Option<Priority>,
    /// New forecast budget
    pub planned_budget: Option<f64>,
    /// New approved budget
    pub approved_budget: Option<f64>,
    /// New expected attendance
    pub expected_attendees: Option<i32>,
    /// New notes
    pub notes: Option<String>,
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("Event title cannot be empty"));
    }
    Ok(title)
}

fn validate_schedule(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<()> {
    match (starts_at, ends_at) {
        (Some(starts_at), Some(ends_at)) if ends_at < starts_at => {
            Err(Error::validation("Event cannot end before it starts"))
        }
        _ => Ok(()),
    }
}

fn validate_budget(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(Error::validation(format!("Invalid {field}: {v}")))
        }
        _ => Ok(()),
    }
}

/// Opens the approval request of an event saved in `aguardando_aprovacao`.
async fn request_approval_if_awaiting(db: &DatabaseConnection, saved: &event::Model) {
    if saved.status == EventStatus::AwaitingApproval {
        let _ = ensure_approval_request(db, Some(saved)).await;
    }
}

/// Registers a new event in the `input` stage.
///
/// Blank optional text fields are stored as null.
pub async fn create_event(db: &DatabaseConnection, new: NewEvent) -> Result<event::Model> {
    let title = validate_title(&new.title)?;
    validate_schedule(new.starts_at, new.ends_at)?;
    validate_budget("planned budget", new.planned_budget)?;

    let now = Utc::now();
    let event = event::ActiveModel {
        title: Set(title.to_string()),
        description: Set(super::non_blank(new.description)),
        kind: Set(super::non_blank(new.kind)),
        venue: Set(super::non_blank(new.venue)),
        starts_at: Set(new.starts_at),
        ends_at: Set(new.ends_at),
        status: Set(EventStatus::Input),
        priority: Set(new.priority.unwrap_or(Priority::Medium)),
        department_id: Set(new.department_id),
        team_id: Set(new.team_id),
        owner_id: Set(new.owner_id),
        requester_id: Set(new.requester_id),
        planned_budget: Set(new.planned_budget),
        approved_budget: Set(None),
        expected_attendees: Set(new.expected_attendees),
        notes: Set(super::non_blank(new.notes)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = event.insert(db).await?;
    info!("Created event {} ({})", created.id, created.title);
    Ok(created)
}

/// Finds an event by its unique ID.
pub async fn get_event_by_id(db: &DatabaseConnection, event_id: i64) -> Result<Option<event::Model>> {
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Events in `status`, earliest start first; undated events last.
pub async fn list_events_by_status(
    db: &DatabaseConnection,
    status: EventStatus,
) -> Result<Vec<event::Model>> {
    let mut events = Event::find()
        .filter(event::Column::Status.eq(status))
        .order_by_asc(event::Column::Id)
        .all(db)
        .await?;
    events.sort_by_key(|e| (e.starts_at.is_none(), e.starts_at));
    Ok(events)
}

/// Applies `changes` to an event.
///
/// The merged start and end must stay in order. Saving the event in
/// `aguardando_aprovacao` opens its approval request if none is pending.
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i64,
    changes: EventChanges,
) -> Result<event::Model> {
    let current = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let title = changes.title.as_deref().map(validate_title).transpose()?;
    validate_schedule(
        changes.starts_at.or(current.starts_at),
        changes.ends_at.or(current.ends_at),
    )?;
    validate_budget("planned budget", changes.planned_budget)?;
    validate_budget("approved budget", changes.approved_budget)?;

    let mut event: event::ActiveModel = current.into();
    if let Some(title) = title {
        event.title = Set(title.to_string());
    }
    if changes.description.is_some() {
        event.description = Set(super::non_blank(changes.description));
    }
    if changes.kind.is_some() {
        event.kind = Set(super::non_blank(changes.kind));
    }
    if changes.venue.is_some() {
        event.venue = Set(super::non_blank(changes.venue));
    }
    if changes.notes.is_some() {
        event.notes = Set(super::non_blank(changes.notes));
    }
    if let Some(starts_at) = changes.starts_at {
        event.starts_at = Set(Some(starts_at));
    }
    if let Some(ends_at) = changes.ends_at {
        event.ends_at = Set(Some(ends_at));
    }
    if let Some(status) = changes.status {
        event.status = Set(status);
    }
    if let Some(priority) = changes.priority {
        event.priority = Set(priority);
    }
    if let Some(budget) = changes.planned_budget {
        event.planned_budget = Set(Some(budget));
    }
    if let Some(budget) = changes.approved_budget {
        event.approved_budget = Set(Some(budget));
    }
    if let Some(attendees) = changes.expected_attendees {
        event.expected_attendees = Set(Some(attendees));
    }
    event.updated_at = Set(Utc::now());

    let updated = event.update(db).await?;
    info!("Updated event {} ({})", updated.id, updated.title);

    request_approval_if_awaiting(db, &updated).await;
    Ok(updated)
}

/// Deletes an event together with its tasks, budget items and approvals.
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Task::delete_many()
        .filter(task::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    BudgetItem::delete_many()
        .filter(budget_item::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;
    Approval::delete_many()
        .filter(approval::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;

    let deleted = Event::delete_by_id(event_id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        // Dropping the transaction rolls back the child deletes
        return Err(Error::EventNotFound { id: event_id });
    }

    txn.commit().await?;
    info!("Deleted event {}", event_id);
    Ok(())
}

/// Sets an event's status by hand.
///
/// Any stage may be chosen, including the ones the synchronizer never assigns
/// (`execucao`, `pos_evento`, `cancelado`). Moving an event to
/// `aguardando_aprovacao` opens its approval request.
pub async fn set_event_status(
    db: &DatabaseConnection,
    event_id: i64,
    status: EventStatus,
) -> Result<event::Model> {
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;
    let previous = event.status;

    let mut event: event::ActiveModel = event.into();
    event.status = Set(status);
    event.updated_at = Set(Utc::now());
    let updated = event.update(db).await?;

    info!("Event {} manually moved from {} to {}", event_id, previous, status);

    request_approval_if_awaiting(db, &updated).await;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{ApprovalStatus, TaskStatus};
    use crate::test_utils::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_event_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_event(
            &db,
            NewEvent {
                title: "   ".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let start = Utc::now();
        let result = create_event(
            &db,
            NewEvent {
                title: "Backwards".to_string(),
                starts_at: Some(start),
                ends_at: Some(start - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_event(
            &db,
            NewEvent {
                title: "Negative".to_string(),
                planned_budget: Some(-1.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_event_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let event = create_event(
            &db,
            NewEvent {
                title: "  Semana de Integração ".to_string(),
                venue: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(event.title, "Semana de Integração");
        assert_eq!(event.status, EventStatus::Input);
        assert_eq!(event.priority, Priority::Medium);
        assert!(event.venue.is_none());
        assert_eq!(get_event_by_id(&db, event.id).await?.unwrap().id, event.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_event_status_allows_manual_stages() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        let cancelled = set_event_status(&db, event.id, EventStatus::Cancelled).await?;
        assert_eq!(cancelled.status, EventStatus::Cancelled);

        let missing = set_event_status(&db, 999, EventStatus::PostEvent).await;
        assert!(matches!(missing, Err(Error::EventNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_manual_move_to_awaiting_opens_request() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        set_event_status(&db, event.id, EventStatus::AwaitingApproval).await?;
        assert_eq!(count_pending_event_approvals(&db, event.id).await?, 1);

        // Saving the same stage again keeps the single request
        set_event_status(&db, event.id, EventStatus::AwaitingApproval).await?;
        assert_eq!(count_pending_event_approvals(&db, event.id).await?, 1);

        let other = create_test_event(&db, "Other").await?;
        set_event_status(&db, other.id, EventStatus::BudgetGeneration).await?;
        assert_eq!(count_pending_event_approvals(&db, other.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_applies_changes() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let start = Utc::now();

        let updated = update_event(
            &db,
            event.id,
            EventChanges {
                title: Some(" Feira de Carreiras ".to_string()),
                venue: Some("Auditório".to_string()),
                starts_at: Some(start),
                ends_at: Some(start + Duration::hours(4)),
                priority: Some(Priority::High),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.title, "Feira de Carreiras");
        assert_eq!(updated.venue.as_deref(), Some("Auditório"));
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, EventStatus::Input);
        assert_eq!(count_pending_event_approvals(&db, event.id).await?, 0);

        // The new end is checked against the stored start
        let backwards = update_event(
            &db,
            event.id,
            EventChanges {
                ends_at: Some(start - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(backwards, Err(Error::Validation { .. })));

        let blank = update_event(
            &db,
            event.id,
            EventChanges {
                title: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(blank, Err(Error::Validation { .. })));

        let missing = update_event(&db, 999, EventChanges::default()).await;
        assert!(matches!(missing, Err(Error::EventNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_event_to_awaiting_opens_request() -> Result<()> {
        let (db, event) = setup_with_event().await?;

        let updated = update_event(
            &db,
            event.id,
            EventChanges {
                status: Some(EventStatus::AwaitingApproval),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.status, EventStatus::AwaitingApproval);
        assert_eq!(count_pending_event_approvals(&db, event.id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event_removes_children() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let kept = create_test_event(&db, "Kept").await?;
        insert_test_task(&db, event.id, TaskStatus::Done).await?;
        insert_test_budget_item(&db, event.id, 1.0, 10.0).await?;
        create_test_approval(&db, Some(event.id), ApprovalStatus::Pending).await?;
        insert_test_task(&db, kept.id, TaskStatus::Pending).await?;

        delete_event(&db, event.id).await?;

        assert!(get_event_by_id(&db, event.id).await?.is_none());
        assert_eq!(
            Task::find()
                .filter(task::Column::EventId.eq(event.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            BudgetItem::find()
                .filter(budget_item::Column::EventId.eq(event.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(count_pending_event_approvals(&db, event.id).await?, 0);
        assert_eq!(
            Task::find()
                .filter(task::Column::EventId.eq(kept.id))
                .count(&db)
                .await?,
            1
        );

        let missing = delete_event(&db, event.id).await;
        assert!(matches!(missing, Err(Error::EventNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_events_by_status_orders_by_start() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let later = create_event(
            &db,
            NewEvent {
                title: "Later".to_string(),
                starts_at: Some(now + Duration::days(10)),
                ..Default::default()
            },
        )
        .await?;
        let undated = create_test_event(&db, "Undated").await?;
        let sooner = create_event(
            &db,
            NewEvent {
                title: "Sooner".to_string(),
                starts_at: Some(now + Duration::days(1)),
                ..Default::default()
            },
        )
        .await?;
        create_event_with_status(&db, "Running", EventStatus::Execution).await?;

        let ids: Vec<_> = list_events_by_status(&db, EventStatus::Input)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![sooner.id, later.id, undated.id]);
        Ok(())
    }
}
