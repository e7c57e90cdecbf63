//! Error types for dd-core

use thiserror::Error;

/// Core error type for dbdelta
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migration directory missing and could not be created
    #[error("[E003] Could not create migration directory '{path}': {source}")]
    MigrationDirUnavailable {
        path: String,
        source: std::io::Error,
    },

    /// E004: Required argument was not supplied
    #[error("[E004] Missing argument: {message}")]
    MissingArgument { message: String },

    /// E005: Migration name would escape the migration directory
    #[error("[E005] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E006: Migration file not found
    #[error("[E006] Migration not found: {id}")]
    MigrationNotFound { id: String },

    /// E007: Migration file is not a well-formed patch document
    #[error("[E007] Failed to parse migration {id}: {message}")]
    DefinitionParse { id: String, message: String },

    /// E008: Scaffold target exists and overwriting is disabled
    #[error("[E008] Migration file already exists: {path}")]
    ScaffoldExists { path: String },

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with file path context
    #[error("[E010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E011: YAML parse error
    #[error("[E011] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
