//! Approval request guard and approval listings.
//!
//! [`ensure_approval_request`] keeps at most one pending `"evento"` approval per event.
//! The existence check and the insert are separate statements, so the store's partial
//! unique index is what finally rejects a concurrent duplicate; losing that race is
//! reported the same way as finding the request already open.

use crate::{
    core::housekeeping::Housekeeping,
    entities::{Approval, ApprovalStatus, approval, event},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, SqlErr, prelude::*};
use tracing::{debug, info};

/// What the guard did for an event.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// No event was given
    NoEvent,
    /// A pending request already existed
    AlreadyPending {
        /// Identifier of the open request
        approval_id: i64,
    },
    /// A new pending request was opened
    Created(approval::Model),
}

/// Number of approvals in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalCounts {
    /// Waiting for a decision
    pub pending: u64,
    /// Approved
    pub approved: u64,
    /// Rejected
    pub rejected: u64,
}

/// Opens a pending `"evento"` approval for `event` unless one is already open.
///
/// Best effort: failures are logged and returned inside the [`Housekeeping`], never
/// propagated. Passing `None` is a no-op.
pub async fn ensure_approval_request(
    db: &DatabaseConnection,
    event: Option<&event::Model>,
) -> Housekeeping<GuardOutcome> {
    let Some(event) = event else {
        return Housekeeping::settle("Approval request", Ok(GuardOutcome::NoEvent));
    };

    Housekeeping::settle(
        &format!("Approval request for event {}", event.id),
        request_event_approval(db, event).await,
    )
}

async fn request_event_approval(
    db: &DatabaseConnection,
    event: &event::Model,
) -> Result<GuardOutcome> {
    if let Some(existing) = find_pending_event_approval(db, event.id).await? {
        debug!(
            "Event {} already has pending approval {}",
            event.id, existing.id
        );
        return Ok(GuardOutcome::AlreadyPending {
            approval_id: existing.id,
        });
    }

    insert_event_approval(db, event).await
}

/// Inserts the pending request; a unique violation means another caller won.
async fn insert_event_approval(
    db: &DatabaseConnection,
    event: &event::Model,
) -> Result<GuardOutcome> {
    let request = approval::ActiveModel {
        event_id: Set(Some(event.id)),
        kind: Set(Some(approval::KIND_EVENT.to_string())),
        status: Set(ApprovalStatus::Pending),
        requester_id: Set(event.requester_id.or(event.owner_id)),
        team_id: Set(event.team_id),
        requested_at: Set(Utc::now()),
        ..Default::default()
    };

    match request.insert(db).await {
        Ok(created) => {
            info!(
                "Opened approval {} for event {}",
                created.id, created.event_id.unwrap_or(event.id)
            );
            Ok(GuardOutcome::Created(created))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            debug!("Event {} request opened concurrently, reusing it", event.id);
            let winner = find_pending_event_approval(db, event.id)
                .await?
                .ok_or(Error::Database(e))?;
            Ok(GuardOutcome::AlreadyPending {
                approval_id: winner.id,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Finds the open `"evento"` approval for an event, if any.
pub async fn find_pending_event_approval(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<approval::Model>> {
    Approval::find()
        .filter(approval::Column::EventId.eq(event_id))
        .filter(approval::Column::Kind.eq(approval::KIND_EVENT))
        .filter(approval::Column::Status.eq(ApprovalStatus::Pending))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an approval by its unique ID.
pub async fn get_approval_by_id(
    db: &DatabaseConnection,
    approval_id: i64,
) -> Result<Option<approval::Model>> {
    Approval::find_by_id(approval_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Pending approvals, most recently requested first.
pub async fn list_pending_approvals(db: &DatabaseConnection) -> Result<Vec<approval::Model>> {
    Approval::find()
        .filter(approval::Column::Status.eq(ApprovalStatus::Pending))
        .order_by_desc(approval::Column::RequestedAt)
        .order_by_desc(approval::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Decided approvals, most recently answered first.
///
/// Rows without a response date sort by their request date.
pub async fn list_decided_approvals(db: &DatabaseConnection) -> Result<Vec<approval::Model>> {
    let mut decided = Approval::find()
        .filter(approval::Column::Status.ne(ApprovalStatus::Pending))
        .all(db)
        .await?;

    decided.sort_by(|a, b| {
        let a_at = a.responded_at.unwrap_or(a.requested_at);
        let b_at = b.responded_at.unwrap_or(b.requested_at);
        b_at.cmp(&a_at).then_with(|| b.id.cmp(&a.id))
    });
    Ok(decided)
}

/// Counts approvals per status.
pub async fn approval_counts(db: &DatabaseConnection) -> Result<ApprovalCounts> {
    let count = |status: ApprovalStatus| {
        Approval::find()
            .filter(approval::Column::Status.eq(status))
            .count(db)
    };

    Ok(ApprovalCounts {
        pending: count(ApprovalStatus::Pending).await?,
        approved: count(ApprovalStatus::Approved).await?,
        rejected: count(ApprovalStatus::Rejected).await?,
    })
}
