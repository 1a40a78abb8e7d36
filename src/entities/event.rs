//! Event entity - the planned occasion being managed.
//!
//! An event carries its workflow `status`, the people and team responsible for it,
//! and free-form descriptive fields. Status is either edited by staff or advanced
//! automatically by [`crate::core::progress`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow stage of an event.
///
/// Declaration order is the workflow order, so the derived `Ord` can be used to
/// compare stages. Only the first four are assigned automatically.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum EventStatus {
    /// Event was registered, nothing planned yet
    #[sea_orm(string_value = "input")]
    #[serde(rename = "input")]
    Input,
    /// Tasks are being created
    #[sea_orm(string_value = "criacao_tarefas")]
    #[serde(rename = "criacao_tarefas")]
    TaskCreation,
    /// Budget items are being gathered
    #[sea_orm(string_value = "geracao_orcamento")]
    #[serde(rename = "geracao_orcamento")]
    BudgetGeneration,
    /// Waiting for an approver to sign off
    #[sea_orm(string_value = "aguardando_aprovacao")]
    #[serde(rename = "aguardando_aprovacao")]
    AwaitingApproval,
    /// Approved and running
    #[sea_orm(string_value = "execucao")]
    #[serde(rename = "execucao")]
    Execution,
    /// Wrap-up after the event took place
    #[sea_orm(string_value = "pos_evento")]
    #[serde(rename = "pos_evento")]
    PostEvent,
    /// Cancelled, terminal
    #[sea_orm(string_value = "cancelado")]
    #[serde(rename = "cancelado")]
    Cancelled,
}

/// Stages the progress synchronizer may assign, in advancement order.
pub const AUTO_STATUSES: [EventStatus; 4] = [
    EventStatus::Input,
    EventStatus::TaskCreation,
    EventStatus::BudgetGeneration,
    EventStatus::AwaitingApproval,
];

impl EventStatus {
    /// Position among [`AUTO_STATUSES`], or `None` for manually-set stages.
    #[must_use]
    pub const fn auto_rank(self) -> Option<usize> {
        match self {
            Self::Input => Some(0),
            Self::TaskCreation => Some(1),
            Self::BudgetGeneration => Some(2),
            Self::AwaitingApproval => Some(3),
            Self::Execution | Self::PostEvent | Self::Cancelled => None,
        }
    }

    /// Whether the synchronizer is allowed to touch an event in this stage.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        self.auto_rank().is_some()
    }

    /// Auto stages strictly below `self`; empty for `Input` and for manual stages.
    #[must_use]
    pub fn auto_statuses_below(self) -> Vec<Self> {
        self.auto_rank()
            .map(|rank| AUTO_STATUSES[..rank].to_vec())
            .unwrap_or_default()
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Priority shared by events and tasks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Priority {
    /// Low
    #[sea_orm(string_value = "baixa")]
    #[serde(rename = "baixa")]
    Low,
    /// Medium, the default
    #[sea_orm(string_value = "media")]
    #[serde(rename = "media")]
    Medium,
    /// High
    #[sea_orm(string_value = "alta")]
    #[serde(rename = "alta")]
    High,
    /// Urgent
    #[sea_orm(string_value = "urgente")]
    #[serde(rename = "urgente")]
    Urgent,
}

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "eventos")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short title shown in listings
    #[sea_orm(column_name = "titulo")]
    pub title: String,
    /// Longer description
    #[sea_orm(column_name = "descricao")]
    pub description: Option<String>,
    /// Free-form kind of event (e.g. "congresso", "workshop")
    #[sea_orm(column_name = "tipo")]
    pub kind: Option<String>,
    /// Venue
    #[sea_orm(column_name = "local")]
    pub venue: Option<String>,
    /// When the event starts
    #[sea_orm(column_name = "data_inicio")]
    pub starts_at: Option<DateTimeUtc>,
    /// When the event ends
    #[sea_orm(column_name = "data_fim")]
    pub ends_at: Option<DateTimeUtc>,
    /// Current workflow stage
    pub status: EventStatus,
    /// Priority
    #[sea_orm(column_name = "prioridade")]
    pub priority: Priority,
    /// Owning department
    #[sea_orm(column_name = "departamento_id")]
    pub department_id: Option<i64>,
    /// Owning team
    #[sea_orm(column_name = "equipe_id")]
    pub team_id: Option<i64>,
    /// Profile responsible for running the event
    #[sea_orm(column_name = "responsavel_id")]
    pub owner_id: Option<i64>,
    /// Profile that requested the event
    #[sea_orm(column_name = "solicitante_id")]
    pub requester_id: Option<i64>,
    /// Forecast budget
    #[sea_orm(column_name = "orcamento_previsto")]
    pub planned_budget: Option<f64>,
    /// Budget granted after approval
    #[sea_orm(column_name = "orcamento_aprovado")]
    pub approved_budget: Option<f64>,
    /// Expected attendance
    #[sea_orm(column_name = "participantes_esperados")]
    pub expected_attendees: Option<i32>,
    /// Notes
    #[sea_orm(column_name = "observacoes")]
    pub notes: Option<String>,
    /// When the event was created
    pub created_at: DateTimeUtc,
    /// When the event was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// One event has many budget items
    #[sea_orm(has_many = "super::budget_item::Entity")]
    BudgetItems,
    /// One event has many approval requests
    #[sea_orm(has_many = "super::approval::Entity")]
    Approvals,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItems.def()
    }
}

impl Related<super::approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
