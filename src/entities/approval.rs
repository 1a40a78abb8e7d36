//! Approval entity - a single request for a decision.
//!
//! Approvals are opened by the approval request guard and closed exactly once by
//! the decision handler. At most one pending approval may exist per event and kind;
//! the store enforces this with a partial unique index created in
//! [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind used for whole-event sign-off requests.
pub const KIND_EVENT: &str = "evento";

/// Kind used for budget sign-off requests.
pub const KIND_BUDGET: &str = "orcamento";

/// Lifecycle of an approval request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ApprovalStatus {
    /// Waiting for a decision
    #[sea_orm(string_value = "pendente")]
    #[serde(rename = "pendente")]
    Pending,
    /// Approved
    #[sea_orm(string_value = "aprovado")]
    #[serde(rename = "aprovado")]
    Approved,
    /// Rejected
    #[sea_orm(string_value = "rejeitado")]
    #[serde(rename = "rejeitado")]
    Rejected,
}

impl ApprovalStatus {
    /// Whether a decision has been recorded.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Approval database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "aprovacoes")]
pub struct Model {
    /// Unique identifier for the approval
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event under review, if any
    #[sea_orm(column_name = "evento_id")]
    pub event_id: Option<i64>,
    /// Request kind, see [`KIND_EVENT`] and [`KIND_BUDGET`]
    #[sea_orm(column_name = "tipo")]
    pub kind: Option<String>,
    /// Current status
    pub status: ApprovalStatus,
    /// Profile that asked for the approval
    #[sea_orm(column_name = "solicitante_id")]
    pub requester_id: Option<i64>,
    /// Profile that decided, set only on decision
    #[sea_orm(column_name = "aprovador_id")]
    pub approver_id: Option<i64>,
    /// Decision notes; required when rejecting
    #[sea_orm(column_name = "observacoes")]
    pub notes: Option<String>,
    /// Team the request is routed through
    #[sea_orm(column_name = "equipe_id")]
    pub team_id: Option<i64>,
    /// When the request was opened
    #[sea_orm(column_name = "data_solicitacao")]
    pub requested_at: DateTimeUtc,
    /// When the decision was recorded
    #[sea_orm(column_name = "data_resposta")]
    pub responded_at: Option<DateTimeUtc>,
}

impl Model {
    /// Whether this approval signs off a whole event.
    #[must_use]
    pub fn is_event_kind(&self) -> bool {
        self.kind.as_deref() == Some(KIND_EVENT)
    }
}

/// Defines relationships between Approval and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An approval optionally refers to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
