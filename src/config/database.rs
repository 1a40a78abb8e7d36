//! Database configuration module for the event workflow.
//!
//! This module handles the store connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. On top of the generated tables it installs
//! the partial unique index that keeps at most one pending approval per event and kind.

use crate::entities::{Approval, BudgetItem, Department, Event, Profile, Task, Team};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/event_workflow.sqlite?mode=rwc";

/// One pending approval per `(evento_id, tipo)`; decided rows are unconstrained.
const PENDING_APPROVAL_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     ux_aprovacoes_pendente ON aprovacoes (evento_id, tipo) WHERE status = 'pendente'";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the store named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables (if missing) and the pending-approval uniqueness index.
///
/// Safe to call on every start-up.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children so foreign keys resolve
    create_table(db, &schema, Team).await?;
    create_table(db, &schema, Department).await?;
    create_table(db, &schema, Profile).await?;
    create_table(db, &schema, Event).await?;
    create_table(db, &schema, Task).await?;
    create_table(db, &schema, BudgetItem).await?;
    create_table(db, &schema, Approval).await?;

    // MySQL has no partial indexes; there the guard's existence check is the only protection
    if backend != DatabaseBackend::MySql {
        db.execute_unprepared(PENDING_APPROVAL_INDEX).await?;
    }

    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
