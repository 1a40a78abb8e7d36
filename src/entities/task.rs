//! Task entity - a unit of work belonging to exactly one event.
//!
//! Task status changes are the main trigger for progress synchronization.

use super::event::Priority;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Progress of a single task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TaskStatus {
    /// Not started
    #[sea_orm(string_value = "pendente")]
    #[serde(rename = "pendente")]
    Pending,
    /// Being worked on
    #[sea_orm(string_value = "em_andamento")]
    #[serde(rename = "em_andamento")]
    InProgress,
    /// Finished
    #[sea_orm(string_value = "concluida")]
    #[serde(rename = "concluida")]
    Done,
    /// Dropped; still counts as not done
    #[sea_orm(string_value = "cancelada")]
    #[serde(rename = "cancelada")]
    Cancelled,
}

/// Task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tarefas")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event this task belongs to
    #[sea_orm(column_name = "evento_id")]
    pub event_id: i64,
    /// Title
    #[sea_orm(column_name = "titulo")]
    pub title: String,
    /// Optional details
    #[sea_orm(column_name = "descricao")]
    pub description: Option<String>,
    /// Assigned profile
    #[sea_orm(column_name = "responsavel_id")]
    pub assignee_id: Option<i64>,
    /// Due date
    #[sea_orm(column_name = "prazo")]
    pub due_at: Option<DateTimeUtc>,
    /// Current status
    pub status: TaskStatus,
    /// Priority
    #[sea_orm(column_name = "prioridade")]
    pub priority: Priority,
    /// When the task was marked done
    #[sea_orm(column_name = "data_conclusao")]
    pub completed_at: Option<DateTimeUtc>,
    /// Team doing the work
    #[sea_orm(column_name = "equipe_id")]
    pub team_id: Option<i64>,
    /// When the task was created
    pub created_at: DateTimeUtc,
    /// When the task was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each task belongs to one event
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
