//! Profile entity - a staff member who can request, own or approve events.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "perfis")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    #[sea_orm(column_name = "nome")]
    pub name: Option<String>,
    /// Login e-mail
    pub email: String,
    /// Role label (e.g. "gestor", "aprovador")
    #[sea_orm(column_name = "papel")]
    pub role: Option<String>,
    /// Team the profile belongs to
    #[sea_orm(column_name = "equipe_id")]
    pub team_id: Option<i64>,
    /// Department the profile belongs to
    #[sea_orm(column_name = "departamento_id")]
    pub department_id: Option<i64>,
    /// Inactive profiles are kept for history only
    #[sea_orm(column_name = "ativo")]
    pub active: bool,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Name to show for this profile, falling back to the e-mail.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// `Profile` has no relationships tracked by the workflow engine
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
