/// Database configuration and connection management
pub mod database;

/// Team and department seeds from config.toml
pub mod directory;
