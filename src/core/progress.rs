//! Event progress synchronization.
//!
//! After every task or budget mutation the event's workflow status is re-derived from
//! its tasks and budget items and, when the derived stage is further along, advanced.
//! Only the four auto stages are ever touched and status never moves backwards:
//!
//! - no tasks and no budget items: `input`
//! - any task: `criacao_tarefas`
//! - any budget item: `geracao_orcamento`
//! - budget items and tasks, all tasks done: `aguardando_aprovacao`
//!
//! Entering `aguardando_aprovacao` opens the event's approval request. The write is a
//! conditional update that only matches lower auto stages, so a concurrent manual edit
//! wins over a stale synchronization.

use crate::{
    core::{approval::ensure_approval_request, housekeeping::Housekeeping},
    entities::{
        AUTO_STATUSES, BudgetItem, Event, EventStatus, Task, TaskStatus, budget_item, event, task,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QuerySelect, Set, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What a synchronization run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No event identifier was given
    NoEvent,
    /// The event is in a manually-controlled stage and was left alone
    OutsideAutoRange(EventStatus),
    /// The derived stage is not ahead of the current one
    Unchanged(EventStatus),
    /// The event moved forward
    Advanced {
        /// Stage before the run
        from: EventStatus,
        /// Stage after the run
        to: EventStatus,
    },
    /// The event changed underneath this run and the write matched nothing
    Superseded {
        /// Stage this run tried to assign
        target: EventStatus,
    },
}

/// Tally of a multi-event synchronization sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Distinct events processed
    pub examined: usize,
    /// Events that moved forward
    pub advanced: usize,
    /// Runs that ended in an error (already logged)
    pub failed: usize,
}

/// Derives the auto stage an event's tasks and budget items call for.
///
/// Later rules override earlier ones; a cancelled task still counts as not done.
#[must_use]
pub fn target_status(task_statuses: &[TaskStatus], budget_item_count: u64) -> EventStatus {
    let has_tasks = !task_statuses.is_empty();
    let has_budget = budget_item_count > 0;
    let has_pending_tasks = task_statuses.iter().any(|s| *s != TaskStatus::Done);

    let mut target = EventStatus::Input;
    if has_tasks {
        target = EventStatus::TaskCreation;
    }
    if has_budget {
        target = EventStatus::BudgetGeneration;
    }
    if has_budget && has_tasks && !has_pending_tasks {
        target = EventStatus::AwaitingApproval;
    }
    target
}

/// Re-derives and, if further along, advances the status of one event.
///
/// Fire-and-forget housekeeping: every failure is logged inside the returned
/// [`Housekeeping`] and never propagated. `None` is a no-op.
pub async fn sync_event_progress(
    db: &DatabaseConnection,
    event_id: Option<i64>,
) -> Housekeeping<SyncOutcome> {
    let Some(event_id) = event_id else {
        return Housekeeping::settle("Event progress sync", Ok(SyncOutcome::NoEvent));
    };

    Housekeeping::settle(
        &format!("Progress sync for event {event_id}"),
        advance_event(db, event_id).await,
    )
}

async fn advance_event(db: &DatabaseConnection, event_id: i64) -> Result<SyncOutcome> {
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;
    let current = event.status;

    if !current.is_auto() {
        debug!("Event {} is in manual stage {}, skipping", event_id, current);
        return Ok(SyncOutcome::OutsideAutoRange(current));
    }

    let task_statuses: Vec<TaskStatus> = Task::find()
        .filter(task::Column::EventId.eq(event_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.status)
        .collect();
    let budget_item_count = BudgetItem::find()
        .filter(budget_item::Column::EventId.eq(event_id))
        .count(db)
        .await?;

    let target = target_status(&task_statuses, budget_item_count);

    // The request may have been lost while the event sat in this stage
    if current == EventStatus::AwaitingApproval {
        let _ = ensure_approval_request(db, Some(&event)).await;
    }

    if target <= current {
        return Ok(SyncOutcome::Unchanged(current));
    }

    let updated = Event::update_many()
        .set(event::ActiveModel {
            status: Set(target),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .filter(event::Column::Id.eq(event_id))
        .filter(event::Column::Status.is_in(target.auto_statuses_below()))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        warn!(
            "Event {} changed during sync; not moving it to {}",
            event_id, target
        );
        return Ok(SyncOutcome::Superseded { target });
    }

    info!("Event {} advanced from {} to {}", event_id, current, target);

    if target == EventStatus::AwaitingApproval {
        let _ = ensure_approval_request(db, Some(&event)).await;
    }

    Ok(SyncOutcome::Advanced {
        from: current,
        to: target,
    })
}

/// Synchronizes each distinct event in `event_ids`, in first-seen order.
pub async fn sync_events<I>(db: &DatabaseConnection, event_ids: I) -> SyncSummary
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = HashSet::new();
    let mut summary = SyncSummary::default();

    for event_id in event_ids {
        if !seen.insert(event_id) {
            continue;
        }
        summary.examined += 1;
        match sync_event_progress(db, Some(event_id)).await.into_result() {
            Ok(SyncOutcome::Advanced { .. }) => summary.advanced += 1,
            Ok(_) => {}
            Err(_) => summary.failed += 1,
        }
    }

    summary
}

/// Synchronizes every event currently in an auto stage.
///
/// Listing the events is a foreground read and its failure is returned.
pub async fn sync_all_events(db: &DatabaseConnection) -> Result<SyncSummary> {
    let event_ids: Vec<i64> = Event::find()
        .select_only()
        .column(event::Column::Id)
        .filter(event::Column::Status.is_in(AUTO_STATUSES))
        .into_tuple()
        .all(db)
        .await?;

    info!("Synchronizing progress of {} events", event_ids.len());
    Ok(sync_events(db, event_ids).await)
}
