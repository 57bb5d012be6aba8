//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid {kind} option: {value}")]
    InvalidOption { kind: String, value: String },

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    // ---------------------------
    // Work session state
    // ---------------------------
    #[error("No active work session for {0} today")]
    SessionNotActive(String),

    #[error("Work session for {0} is already active")]
    SessionAlreadyActive(String),

    #[error("Work session for {0} is paused")]
    SessionPaused(String),

    #[error("Work session for {0} is not paused")]
    SessionNotPaused(String),

    // ---------------------------
    // Task timers
    // ---------------------------
    #[error("Timer already running for task {task} (user {user})")]
    TimerAlreadyRunning { task: String, user: String },

    #[error("Timer not running for task {task} (user {user})")]
    TimerNotRunning { task: String, user: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Output
    // ---------------------------
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
