use dotenvy::dotenv;
use event_workflow::{
    config::{database, directory},
    core::{directory::seed_directory, progress::sync_all_events},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect to the store and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to the database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed teams and departments; a missing config.toml only skips seeding
    match directory::load_default_config() {
        Ok(config) => {
            seed_directory(&db, &config)
                .await
                .inspect_err(|e| error!("Failed to seed directory: {}", e))?;
        }
        Err(e) => warn!("Skipping directory seed: {}", e),
    }

    // 5. Bring every auto-stage event up to date
    let summary = sync_all_events(&db).await?;
    info!(
        "Progress sweep finished: {} examined, {} advanced, {} failed",
        summary.examined, summary.advanced, summary.failed
    );

    Ok(())
}
