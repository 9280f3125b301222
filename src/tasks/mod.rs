//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache engine.
//!
//! # Tasks
//! - Cleanup: Removes expired cache entries at the configured interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, CleanupHandle};
