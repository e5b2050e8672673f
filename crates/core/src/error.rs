//! Error types for chess960-explorer-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Dataset unreachable or malformed at startup
    #[error("Dataset load failed: {0}")]
    DataLoad(String),

    /// Best moves that cannot be mapped to any category
    #[error("Data integrity violated: unclassifiable best move in position(s) {}", format_numbers(.positions))]
    DataIntegrity { positions: Vec<u32> },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Interaction attempted before the dataset finished loading, or after it failed
    #[error("Explorer is not ready: {0}")]
    NotReady(String),

    #[error("No position numbered {0}")]
    UnknownPosition(u32),
}

fn format_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
