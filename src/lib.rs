//! bluesdr - A sales-lead copilot for the terminal
//!
//! Pasted conversations go to a text-generation service, come back as a
//! six-field lead analysis, and are appended to a local ledger once the
//! operator confirms them.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod leads;
pub mod llm;
pub mod storage;

use thiserror::Error;

/// Main error type for bluesdr
#[derive(Error, Debug)]
pub enum BlueSdrError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Insufficient context: expected {expected} fields in the response, found {found}")]
    InsufficientContext { expected: usize, found: usize },

    #[error("Failed to save lead: {0}")]
    Append(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BlueSdrError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "bluesdr";
