//! Team entity - a group of staff that owns events, tasks and budget lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipes")]
pub struct Model {
    /// Unique identifier for the team
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Team name, unique
    #[sea_orm(column_name = "nome", unique)]
    pub name: String,
    /// What the team does
    #[sea_orm(column_name = "descricao")]
    pub description: Option<String>,
    /// When the team was created
    pub created_at: DateTimeUtc,
}

/// `Team` has no relationships tracked by the workflow engine
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
