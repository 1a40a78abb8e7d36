//! Budget item entity - one priced line of an event's budget.
//!
//! The stored total, when positive, wins over quantity times unit value.
//! See [`crate::core::budget::effective_total`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orcamentos_itens")]
pub struct Model {
    /// Unique identifier for the budget item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event this item is budgeted for
    #[sea_orm(column_name = "evento_id")]
    pub event_id: i64,
    /// Category (e.g. "alimentacao", "transporte")
    #[sea_orm(column_name = "categoria")]
    pub category: Option<String>,
    /// What is being bought
    #[sea_orm(column_name = "descricao")]
    pub description: Option<String>,
    /// Number of units
    #[sea_orm(column_name = "quantidade")]
    pub quantity: Option<f64>,
    /// Price per unit
    #[sea_orm(column_name = "valor_unitario")]
    pub unit_value: Option<f64>,
    /// Stored total, takes precedence when positive
    #[sea_orm(column_name = "valor_total")]
    pub total_value: Option<f64>,
    /// Supplier name
    #[sea_orm(column_name = "fornecedor")]
    pub supplier: Option<String>,
    /// Whether the line was approved
    #[sea_orm(column_name = "aprovado")]
    pub approved: bool,
    /// Team that owns the line
    #[sea_orm(column_name = "equipe_id")]
    pub team_id: Option<i64>,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `BudgetItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget item belongs to one event
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
