//! Metadata resolution.

use tracing::debug;

use crate::drive::{DriveProvider, ItemDescriptor, ProviderError, ResourceRef};

use super::retry::RetryPolicy;

/// Fetch the descriptor behind a reference, retrying transient faults.
///
/// Every failure cause (missing item, missing access, exhausted retries)
/// collapses to [`ProviderError::Unresolvable`]: callers only learn that
/// the reference did not resolve, and pick the message appropriate to
/// their call site.
pub async fn resolve_reference(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    reference: &ResourceRef,
) -> Result<ItemDescriptor, ProviderError> {
    let id = reference.as_str();
    match retry.run("resolve", || provider.resolve(id)).await {
        Ok(descriptor) => {
            debug!(id, name = %descriptor.name, kind = %descriptor.kind, "resolved item");
            Ok(descriptor)
        }
        Err(err) => {
            debug!(id, "resolution failed: {err}");
            Err(ProviderError::unresolvable(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::MemoryProvider;

    fn instant_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: std::time::Duration::ZERO,
            max_backoff: std::time::Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_resolves_existing_item() {
        let provider = MemoryProvider::new();
        let id = provider.add_file("report", None);
        let descriptor =
            resolve_reference(&provider, &instant_retry(), &ResourceRef::new(&id))
                .await
                .unwrap();
        assert_eq!(descriptor.id, id);
        assert_eq!(descriptor.name, "report");
    }

    #[tokio::test]
    async fn test_transient_fault_is_retried_through() {
        let provider = MemoryProvider::new();
        let id = provider.add_file("report", None);
        provider.fail_next("resolve", 2);
        let descriptor =
            resolve_reference(&provider, &instant_retry(), &ResourceRef::new(&id))
                .await
                .unwrap();
        assert_eq!(descriptor.id, id);
    }

    #[tokio::test]
    async fn test_every_failure_collapses_to_unresolvable() {
        let provider = MemoryProvider::new();
        let id = provider.add_file("report", None);
        // More faults than the attempt budget: a transient failure cause.
        provider.fail_next("resolve", 10);
        let err = resolve_reference(&provider, &instant_retry(), &ResourceRef::new(&id))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unresolvable(_)));

        // And a plain missing item: indistinguishable from the above.
        let err = resolve_reference(
            &provider,
            &instant_retry(),
            &ResourceRef::new("does-not-exist"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::Unresolvable(_)));
    }
}
