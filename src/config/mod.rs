/// Database configuration and connection management
pub mod database;

/// Application settings loaded from brokerdesk.toml
pub mod settings;
