use std::time::Instant;

use tracing::info;

/// A timer that logs the duration of an operation when dropped.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
}

impl OperationTimer {
    /// Create a new timer for the given operation name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.name,
            duration_ms = %duration.as_millis(),
            "Operation completed"
        );
    }
}

/// Generate a short request ID for log correlation.
#[must_use]
pub fn generate_request_id() -> String {
    let uuid_str = uuid::Uuid::new_v4().to_string();
    uuid_str.get(..8).unwrap_or(&uuid_str).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer_records_name() {
        let timer = OperationTimer::new("replicate");
        assert_eq!(timer.name, "replicate");
    }

    #[test]
    fn test_operation_timer_drop_does_not_panic() {
        let _timer = OperationTimer::new("drop_check");
    }

    #[test]
    fn test_request_id_is_short_and_unique() {
        let a = generate_request_id();
        let b = generate_request_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
