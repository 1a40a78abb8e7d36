//! Directory business logic - teams, departments and staff profiles.
//!
//! Teams and departments are seeded from config.toml; profiles are the people
//! who request, own and approve events.

use crate::{
    config::directory::Config,
    entities::{Department, Profile, Team, department, profile, team},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// How many directory rows a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Teams inserted
    pub teams_created: usize,
    /// Departments inserted
    pub departments_created: usize,
}

/// Fields accepted when creating a profile.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    /// Login e-mail, required
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role label
    pub role: Option<String>,
    /// Team
    pub team_id: Option<i64>,
    /// Department
    pub department_id: Option<i64>,
}

/// Creates the configured teams and departments that do not exist yet.
///
/// Names are matched exactly; existing rows are left untouched.
pub async fn seed_directory(db: &DatabaseConnection, config: &Config) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for cfg_team in &config.teams {
        let exists = Team::find()
            .filter(team::Column::Name.eq(cfg_team.name.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            debug!("Team '{}' already exists. Skipping.", cfg_team.name);
            continue;
        }

        team::ActiveModel {
            name: Set(cfg_team.name.clone()),
            description: Set(cfg_team.description.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.teams_created += 1;
    }

    for cfg_department in &config.departments {
        let exists = Department::find()
            .filter(department::Column::Name.eq(cfg_department.name.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            debug!("Department '{}' already exists. Skipping.", cfg_department.name);
            continue;
        }

        department::ActiveModel {
            name: Set(cfg_department.name.clone()),
            acronym: Set(cfg_department.acronym.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.departments_created += 1;
    }

    info!(
        "Directory seeded: {} teams, {} departments created",
        summary.teams_created, summary.departments_created
    );
    Ok(summary)
}

/// Creates an active profile.
pub async fn create_profile(db: &DatabaseConnection, new: NewProfile) -> Result<profile::Model> {
    let email = new.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation(format!("Invalid e-mail: '{email}'")));
    }

    let now = Utc::now();
    let profile = profile::ActiveModel {
        name: Set(super::non_blank(new.name)),
        email: Set(email.to_string()),
        role: Set(super::non_blank(new.role)),
        team_id: Set(new.team_id),
        department_id: Set(new.department_id),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    profile.insert(db).await.map_err(Into::into)
}

/// Finds a profile by its unique ID.
pub async fn get_profile_by_id(
    db: &DatabaseConnection,
    profile_id: i64,
) -> Result<Option<profile::Model>> {
    Profile::find_by_id(profile_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Active members of a team, ordered by e-mail.
pub async fn list_team_members(db: &DatabaseConnection, team_id: i64) -> Result<Vec<profile::Model>> {
    Profile::find()
        .filter(profile::Column::TeamId.eq(team_id))
        .filter(profile::Column::Active.eq(true))
        .order_by_asc(profile::Column::Email)
        .all(db)
        .await
        .map_err(Into::into)
}
