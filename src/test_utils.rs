//! Shared test utilities for the event workflow.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults. The `insert_*` helpers write
//! rows directly and do not trigger progress synchronization, so tests can stage
//! data and then run the synchronizer explicitly.

use crate::{
    core::{
        directory::{self, NewProfile},
        event::{self, NewEvent},
    },
    entities::{
        Approval, ApprovalStatus, EventStatus, Priority, TaskStatus, approval, budget_item,
        profile, task,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test event in the `input` stage with only a title.
pub async fn create_test_event(
    db: &DatabaseConnection,
    title: &str,
) -> Result<crate::entities::event::Model> {
    event::create_event(
        db,
        NewEvent {
            title: title.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a test event with explicit requester and owner.
pub async fn create_custom_event(
    db: &DatabaseConnection,
    title: &str,
    requester_id: Option<i64>,
    owner_id: Option<i64>,
) -> Result<crate::entities::event::Model> {
    event::create_event(
        db,
        NewEvent {
            title: title.to_string(),
            requester_id,
            owner_id,
            ..Default::default()
        },
    )
    .await
}

/// Creates a test event and moves it straight to `status`.
pub async fn create_event_with_status(
    db: &DatabaseConnection,
    title: &str,
    status: EventStatus,
) -> Result<crate::entities::event::Model> {
    let created = create_test_event(db, title).await?;
    event::set_event_status(db, created.id, status).await
}

/// Inserts a task without synchronizing the event.
pub async fn insert_test_task(
    db: &DatabaseConnection,
    event_id: i64,
    status: TaskStatus,
) -> Result<task::Model> {
    let now = Utc::now();
    let task = task::ActiveModel {
        event_id: Set(event_id),
        title: Set("Test task".to_string()),
        status: Set(status),
        priority: Set(Priority::Medium),
        completed_at: Set((status == TaskStatus::Done).then_some(now)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(task.insert(db).await?)
}

/// Inserts a budget item without synchronizing the event.
///
/// The stored total is left empty so the line total comes from quantity and unit value.
pub async fn insert_test_budget_item(
    db: &DatabaseConnection,
    event_id: i64,
    quantity: f64,
    unit_value: f64,
) -> Result<budget_item::Model> {
    let now = Utc::now();
    let item = budget_item::ActiveModel {
        event_id: Set(event_id),
        description: Set(Some("Test item".to_string())),
        quantity: Set(Some(quantity)),
        unit_value: Set(Some(unit_value)),
        approved: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(item.insert(db).await?)
}

/// Creates an active test profile.
pub async fn create_test_profile(db: &DatabaseConnection, email: &str) -> Result<profile::Model> {
    directory::create_profile(
        db,
        NewProfile {
            email: email.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Inserts an `"evento"` approval in the given status.
pub async fn create_test_approval(
    db: &DatabaseConnection,
    event_id: Option<i64>,
    status: ApprovalStatus,
) -> Result<approval::Model> {
    create_custom_approval(db, event_id, approval::KIND_EVENT, status).await
}

/// Inserts an approval of any kind; decided approvals get a response date.
pub async fn create_custom_approval(
    db: &DatabaseConnection,
    event_id: Option<i64>,
    kind: &str,
    status: ApprovalStatus,
) -> Result<approval::Model> {
    let now = Utc::now();
    let approval = approval::ActiveModel {
        event_id: Set(event_id),
        kind: Set(Some(kind.to_string())),
        status: Set(status),
        requested_at: Set(now),
        responded_at: Set(status.is_decided().then_some(now)),
        ..Default::default()
    };
    Ok(approval.insert(db).await?)
}

/// Counts pending `"evento"` approvals of an event.
pub async fn count_pending_event_approvals(db: &DatabaseConnection, event_id: i64) -> Result<u64> {
    Ok(Approval::find()
        .filter(approval::Column::EventId.eq(event_id))
        .filter(approval::Column::Kind.eq(approval::KIND_EVENT))
        .filter(approval::Column::Status.eq(ApprovalStatus::Pending))
        .count(db)
        .await?)
}

/// Sets up a test database holding one event in the `input` stage.
pub async fn setup_with_event() -> Result<(DatabaseConnection, crate::entities::event::Model)> {
    let db = setup_test_db().await?;
    let event = create_test_event(&db, "Test Event").await?;
    Ok((db, event))
}

/// In-memory event for staging mock query results.
#[must_use]
pub fn sample_event(id: i64, status: EventStatus) -> crate::entities::event::Model {
    let now = Utc::now();
    crate::entities::event::Model {
        id,
        title: "Sample event".to_string(),
        description: None,
        kind: None,
        venue: None,
        starts_at: None,
        ends_at: None,
        status,
        priority: Priority::Medium,
        department_id: None,
        team_id: None,
        owner_id: None,
        requester_id: None,
        planned_budget: None,
        approved_budget: None,
        expected_attendees: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory task for staging mock query results.
#[must_use]
pub fn sample_task(id: i64, event_id: i64, status: TaskStatus) -> task::Model {
    let now = Utc::now();
    task::Model {
        id,
        event_id,
        title: "Sample task".to_string(),
        description: None,
        assignee_id: None,
        due_at: None,
        status,
        priority: Priority::Medium,
        completed_at: (status == TaskStatus::Done).then_some(now),
        team_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory approval for tests that never reach the store.
#[must_use]
pub fn sample_approval(id: i64, event_id: Option<i64>, status: ApprovalStatus) -> approval::Model {
    approval::Model {
        id,
        event_id,
        kind: Some(approval::KIND_EVENT.to_string()),
        status,
        requester_id: None,
        approver_id: None,
        notes: None,
        team_id: None,
        requested_at: Utc::now(),
        responded_at: None,
    }
}

/// In-memory budget item for total calculations.
#[must_use]
pub fn sample_budget_item(
    id: i64,
    total_value: Option<f64>,
    quantity: Option<f64>,
    unit_value: Option<f64>,
) -> budget_item::Model {
    let now = Utc::now();
    budget_item::Model {
        id,
        event_id: 1,
        category: None,
        description: None,
        quantity,
        unit_value,
        total_value,
        supplier: None,
        approved: false,
        team_id: None,
        created_at: now,
        updated_at: now,
    }
}
