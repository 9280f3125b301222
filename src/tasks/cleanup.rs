//! Expiration Cleanup Task
//!
//! Background task that periodically removes expired cache entries until its
//! cancellation token fires.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::{write_store, SharedStore};
use crate::error::{CacheError, Result};

// == Cleanup Handle ==
/// Handle on the thread running the cleanup loop.
#[derive(Debug)]
pub struct CleanupHandle {
    thread: JoinHandle<()>,
}

impl CleanupHandle {
    /// Returns true once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Spawns the loop that purges expired entries every `interval`.
///
/// The loop runs on a dedicated thread driving its own current-thread
/// runtime, so it lives exactly as long as `token` stays uncancelled,
/// whatever runtime (if any) the caller is on. It exits without a final pass.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let handle = spawn_cleanup_task(store.clone(), Duration::from_secs(1), token.clone())?;
/// // Later, on close:
/// token.cancel();
/// ```
pub fn spawn_cleanup_task<V>(
    store: SharedStore<V>,
    interval: Duration,
    token: CancellationToken,
) -> Result<CleanupHandle>
where
    V: Send + Sync + 'static,
{
    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CacheError::Runtime(format!("failed to build cleanup runtime: {}", e)))?;

    let thread = thread::Builder::new()
        .name("memory-cache-cleanup".to_string())
        .spawn(move || runtime.block_on(run_cleanup_loop(store, interval, token)))
        .map_err(|e| CacheError::Runtime(format!("failed to spawn cleanup thread: {}", e)))?;

    Ok(CleanupHandle { thread })
}

async fn run_cleanup_loop<V>(store: SharedStore<V>, interval: Duration, token: CancellationToken) {
    info!(
        "Starting cleanup task with interval of {} ms",
        interval.as_millis()
    );

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Cleanup task cancelled");
                return;
            }
            _ = tokio::time::sleep(interval) => {
                let removed = purge_expired(&store);

                if removed > 0 {
                    info!("Cleanup: removed {} expired entries", removed);
                } else {
                    debug!("Cleanup: no expired entries found");
                }
            }
        }
    }
}

/// One pass under the exclusive lock.
fn purge_expired<V>(store: &SharedStore<V>) -> usize {
    let mut guard = write_store(store);
    guard
        .as_mut()
        .map_or(0, |store| store.cleanup_expired(Utc::now()))
}
