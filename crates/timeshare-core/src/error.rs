//! Core error types for timeshare-core.
//!
//! This module defines the error hierarchy using thiserror. Engine errors
//! always describe a caller data problem and are never retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeshare-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Engine (normalization/integration) errors
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while normalizing parameters or evaluating the integrals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A required input key is absent
    #[error("Missing required parameter: {field}")]
    MissingField { field: &'static str },

    /// A parameter violates its domain constraint
    #[error("Invalid value for '{field}': {message}")]
    InvalidRange { field: &'static str, message: String },

    /// The shape factor makes the transition weight undefined
    #[error("Degenerate integrand: shape factor k = {k} makes the transition weight undefined")]
    DegenerateIntegrand { k: f64 },

    /// Empty time window
    #[error("Zero denominator: the time window [{t0}, {t1}] is empty")]
    ZeroDenominator { t0: f64, t1: f64 },

    /// A computed quantity overflowed or became NaN
    #[error("Non-finite {quantity}: {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    /// Reference statistics need at least one assignment
    #[error("Empty collection: no assignments to derive reference statistics from")]
    EmptyAssignments,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
