use crate::types::{MoveId, SpeciesId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the decision engine
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Illegal action: {reason}")]
    IllegalAction { reason: String },

    #[error("No legal actions available for this turn")]
    NoLegalActions,

    #[error("Invalid battle snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Data loading failed")]
    DataLoad(#[from] DataError),

    #[error("Configuration error")]
    Config(#[from] ConfigError),
}

/// Errors related to data loading and access
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}")]
    JsonParse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Species {species} not found in role database")]
    SpeciesNotFound { species: SpeciesId },

    #[error("Move {move_id} not found in move data")]
    MoveNotFound { move_id: MoveId },

    #[error("Role database not found at any known location")]
    RoleDbNotFound,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration format")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Type aliases for the common Result patterns
pub type DecisionResult<T> = Result<T, DecisionError>;
pub type DataResult<T> = Result<T, DataError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
