//! Department entity - organisational unit an event can be filed under.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departamentos")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Department name, unique
    #[sea_orm(column_name = "nome", unique)]
    pub name: String,
    /// Short acronym (e.g. "RH")
    #[sea_orm(column_name = "sigla")]
    pub acronym: Option<String>,
}

/// `Department` has no relationships tracked by the workflow engine
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
