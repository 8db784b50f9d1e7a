//! Error type for the command-line front end.

use std::path::PathBuf;

/// Wraps the library errors plus everything that can go wrong reading a job.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read job file: {path}")]
    JobFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid job: {0}")]
    InvalidInput(String),

    #[error("Unit error: {0}")]
    Core(#[from] eos_core::EosError),

    #[error("Model error: {0}")]
    Model(#[from] eos_models::ModelError),

    #[error("Solver error: {0}")]
    Solver(#[from] eos_solver::SolverError),
}

pub type AppResult<T> = Result<T, AppError>;
