//! Common test utilities

use std::sync::Arc;
use std::time::Duration;

use drivedup_daemon::{DriveProvider, MemoryProvider, Replicator, RetryPolicy};

/// Retry policy that never sleeps, so failure-path tests stay fast.
#[allow(dead_code)] // Test utility for integration tests
pub fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::ZERO,
        max_backoff: Duration::ZERO,
    }
}

/// Build a replicator over the given provider with instant retries.
#[allow(dead_code)] // Test utility for integration tests
pub fn replicator(provider: &Arc<MemoryProvider>) -> Replicator {
    let provider: Arc<dyn DriveProvider> = provider.clone();
    Replicator::new(provider, instant_retry())
}

/// A URL in the shape the front-end passes around, embedding `id`.
#[allow(dead_code)] // Test utility for integration tests
pub fn drive_url(id: &str) -> String {
    format!("https://drive.example.com/drive/folders/{id}?usp=sharing")
}
