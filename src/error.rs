//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror. None of these surface
//! from the public cache operations; they are resolved (logged) internally.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine's fallible internals.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Snapshot file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot was written with a layout this build does not read
    #[error("Incompatible snapshot version: {0}")]
    IncompatibleSnapshot(u32),

    /// Background cleanup runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
