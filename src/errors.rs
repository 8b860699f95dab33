use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: &'static str, id: i64 },

    #[error("Missing required field `{field}` for {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Unknown entity type: {name}")]
    UnknownEntity { name: String },

    #[error("Unknown message channel: {name}")]
    UnknownChannel { name: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
