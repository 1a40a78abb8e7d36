//! Approval decision handling.
//!
//! A human approves or rejects a pending approval. The decision is recorded on the
//! approval and then forwarded to the event:
//!
//! - approving an `"evento"` request starts execution (`execucao`)
//! - rejecting any request sends the event back to `geracao_orcamento` for rework
//!
//! Unlike the background synchronizer this is a foreground action: every failure is
//! returned to the caller and stops the remaining steps. A write that already succeeded
//! is not rolled back.

use crate::{
    entities::{Approval, ApprovalStatus, Event, EventStatus, approval, event},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::info;

/// A human decision on a pending approval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Approve the request
    Approve,
    /// Reject the request; requires a reason
    Reject,
}

impl Decision {
    /// Approval status this decision records.
    #[must_use]
    pub const fn status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }

    /// Stage the event moves to, given whether the approval is an `"evento"` request.
    #[must_use]
    pub const fn next_event_status(self, is_event_kind: bool) -> Option<EventStatus> {
        match self {
            Self::Approve if is_event_kind => Some(EventStatus::Execution),
            Self::Approve => None,
            Self::Reject => Some(EventStatus::BudgetGeneration),
        }
    }
}

/// State after a decision was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    /// The approval as now stored
    pub approval: approval::Model,
    /// Stage the event was moved to, if it was moved
    pub event_status: Option<EventStatus>,
}

/// Records `decision` on a pending approval and forwards the event.
///
/// `observations` are trimmed; blank observations are stored as null and are
/// rejected outright for [`Decision::Reject`].
///
/// # Errors
/// - [`Error::Validation`] for a rejection without a reason (nothing is written)
/// - [`Error::ApprovalAlreadyDecided`] when the approval is no longer pending
/// - [`Error::ApprovalNotFound`] / [`Error::EventNotFound`] for missing records
/// - [`Error::Database`] for store failures
pub async fn decide(
    db: &DatabaseConnection,
    approval: &approval::Model,
    decision: Decision,
    approver_id: Option<i64>,
    observations: &str,
) -> Result<DecisionOutcome> {
    let observations = observations.trim();
    if decision == Decision::Reject && observations.is_empty() {
        return Err(Error::validation("A rejection requires a reason"));
    }
    if approval.status.is_decided() {
        return Err(Error::ApprovalAlreadyDecided {
            id: approval.id,
            status: approval.status,
        });
    }

    let notes = (!observations.is_empty()).then(|| observations.to_string());
    let responded_at = Utc::now();

    // Only a still-pending row matches, so a decision is recorded at most once
    let updated = Approval::update_many()
        .set(approval::ActiveModel {
            status: Set(decision.status()),
            responded_at: Set(Some(responded_at)),
            approver_id: Set(approver_id),
            notes: Set(notes.clone()),
            ..Default::default()
        })
        .filter(approval::Column::Id.eq(approval.id))
        .filter(approval::Column::Status.eq(ApprovalStatus::Pending))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        let stored = Approval::find_by_id(approval.id)
            .one(db)
            .await?
            .ok_or(Error::ApprovalNotFound { id: approval.id })?;
        return Err(Error::ApprovalAlreadyDecided {
            id: stored.id,
            status: stored.status,
        });
    }

    info!(
        "Approval {} recorded as {} by {:?}",
        approval.id,
        decision.status(),
        approver_id
    );

    let decided = approval::Model {
        status: decision.status(),
        responded_at: Some(responded_at),
        approver_id,
        notes,
        ..approval.clone()
    };

    let event_status = match (
        approval.event_id,
        decision.next_event_status(approval.is_event_kind()),
    ) {
        (Some(event_id), Some(next)) => {
            move_event(db, event_id, next).await?;
            Some(next)
        }
        _ => None,
    };

    Ok(DecisionOutcome {
        approval: decided,
        event_status,
    })
}

async fn move_event(db: &DatabaseConnection, event_id: i64, status: EventStatus) -> Result<()> {
    let updated = Event::update_many()
        .set(event::ActiveModel {
            status: Set(status),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .filter(event::Column::Id.eq(event_id))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::EventNotFound { id: event_id });
    }

    info!("Event {} moved to {} by decision", event_id, status);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::approval::find_pending_event_approval;
    use crate::entities::approval::KIND_BUDGET;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    async fn event_status(db: &DatabaseConnection, event_id: i64) -> Result<EventStatus> {
        Ok(Event::find_by_id(event_id).one(db).await?.unwrap().status)
    }

    /// Event in `aguardando_aprovacao` with the request opened on entering it.
    async fn setup_awaiting() -> Result<(DatabaseConnection, event::Model, approval::Model)> {
        let db = setup_test_db().await?;
        let event =
            create_event_with_status(&db, "Congresso", EventStatus::AwaitingApproval).await?;
        let pending = find_pending_event_approval(&db, event.id).await?.unwrap();
        Ok((db, event, pending))
    }

    #[test]
    fn test_decision_routing() {
        assert_eq!(
            Decision::Approve.next_event_status(true),
            Some(EventStatus::Execution)
        );
        assert_eq!(Decision::Approve.next_event_status(false), None);
        assert_eq!(
            Decision::Reject.next_event_status(true),
            Some(EventStatus::BudgetGeneration)
        );
        assert_eq!(
            Decision::Reject.next_event_status(false),
            Some(EventStatus::BudgetGeneration)
        );
    }

    #[tokio::test]
    async fn test_rejection_without_reason_writes_nothing() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let pending = sample_approval(1, Some(1), ApprovalStatus::Pending);

        for blank in ["", "   \n"] {
            let result = decide(&db, &pending, Decision::Reject, Some(3), blank).await;
            assert!(matches!(result, Err(Error::Validation { .. })));
        }

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_decided_approval_is_refused_without_writes() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let approved = sample_approval(1, Some(1), ApprovalStatus::Approved);

        let result = decide(&db, &approved, Decision::Approve, Some(3), "").await;
        assert!(matches!(
            result,
            Err(Error::ApprovalAlreadyDecided {
                id: 1,
                status: ApprovalStatus::Approved
            })
        ));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_event_request_starts_execution() -> Result<()> {
        let (db, event, pending) = setup_awaiting().await?;
        let approver = create_test_profile(&db, "approver@example.com").await?;

        let outcome = decide(&db, &pending, Decision::Approve, Some(approver.id), "  ").await?;
        assert_eq!(outcome.event_status, Some(EventStatus::Execution));
        assert_eq!(event_status(&db, event.id).await?, EventStatus::Execution);

        let stored = Approval::find_by_id(pending.id).one(&db).await?.unwrap();
        assert_eq!(stored.status, ApprovalStatus::Approved);
        assert!(stored.responded_at.is_some());
        assert_eq!(stored.approver_id, Some(approver.id));
        assert!(stored.notes.is_none());
        assert_eq!(outcome.approval.status, stored.status);
        assert_eq!(outcome.approval.approver_id, stored.approver_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_sends_event_back_to_budget() -> Result<()> {
        let (db, event, pending) = setup_awaiting().await?;

        let outcome = decide(
            &db,
            &pending,
            Decision::Reject,
            None,
            "  orçamento incompleto ",
        )
        .await?;
        assert_eq!(outcome.event_status, Some(EventStatus::BudgetGeneration));
        assert_eq!(
            event_status(&db, event.id).await?,
            EventStatus::BudgetGeneration
        );

        let stored = Approval::find_by_id(pending.id).one(&db).await?.unwrap();
        assert_eq!(stored.status, ApprovalStatus::Rejected);
        assert_eq!(stored.notes.as_deref(), Some("orçamento incompleto"));
        assert!(stored.responded_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_approving_budget_request_leaves_event() -> Result<()> {
        let db = setup_test_db().await?;
        let event =
            create_event_with_status(&db, "Feira", EventStatus::AwaitingApproval).await?;
        let request =
            create_custom_approval(&db, Some(event.id), KIND_BUDGET, ApprovalStatus::Pending)
                .await?;

        let outcome = decide(&db, &request, Decision::Approve, None, "ok").await?;
        assert_eq!(outcome.event_status, None);
        assert_eq!(outcome.approval.notes.as_deref(), Some("ok"));
        assert_eq!(
            event_status(&db, event.id).await?,
            EventStatus::AwaitingApproval
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_orphan_approval_is_recorded() -> Result<()> {
        let db = setup_test_db().await?;
        let orphan = create_test_approval(&db, None, ApprovalStatus::Pending).await?;

        let outcome = decide(&db, &orphan, Decision::Reject, None, "sem evento").await?;
        assert_eq!(outcome.event_status, None);
        assert_eq!(outcome.approval.status, ApprovalStatus::Rejected);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_copy_cannot_decide_twice() -> Result<()> {
        let (db, event, pending) = setup_awaiting().await?;

        decide(&db, &pending, Decision::Approve, None, "").await?;

        // `pending` still says pendente; the store knows better
        let again = decide(&db, &pending, Decision::Reject, None, "mudei de ideia").await;
        assert!(matches!(
            again,
            Err(Error::ApprovalAlreadyDecided {
                status: ApprovalStatus::Approved,
                ..
            })
        ));
        assert_eq!(event_status(&db, event.id).await?, EventStatus::Execution);
        Ok(())
    }
}
