//! The provider port: the drive API surface the replication core depends on.

use async_trait::async_trait;
use thiserror::Error;

use super::types::ItemDescriptor;

/// Errors surfaced by a drive backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The item is missing, inaccessible, or otherwise unresolvable.
    /// Causes are deliberately not distinguished; callers only learn that
    /// the reference did not resolve.
    #[error("item '{0}' cannot be resolved")]
    Unresolvable(String),

    /// Any other provider fault (quota, network, server error). Worth
    /// retrying with backoff.
    #[error("provider call failed: {0}")]
    Failure(String),
}

impl ProviderError {
    pub fn unresolvable(id: impl Into<String>) -> Self {
        ProviderError::Unresolvable(id.into())
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        ProviderError::Failure(msg.into())
    }

    /// Whether a retry could plausibly change the outcome.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Failure(_))
    }
}

/// Drive operations the core consumes.
///
/// Implementations are injected (`Arc<dyn DriveProvider>`); the core never
/// constructs a backend itself. All calls are point-in-time: descriptors
/// returned here are snapshots, not live handles.
#[async_trait]
pub trait DriveProvider: Send + Sync {
    /// Fetch an item's descriptor by id.
    async fn resolve(&self, id: &str) -> Result<ItemDescriptor, ProviderError>;

    /// List a folder's direct, non-trashed children.
    async fn list_children(&self, folder_id: &str)
        -> Result<Vec<ItemDescriptor>, ProviderError>;

    /// Create an empty folder under `parent_id`.
    async fn create_folder(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<ItemDescriptor, ProviderError>;

    /// Create a shortcut under `parent_id` pointing at `target_id`.
    async fn create_shortcut(
        &self,
        name: &str,
        parent_id: &str,
        target_id: &str,
    ) -> Result<ItemDescriptor, ProviderError>;

    /// Copy a non-folder item into `parent_id` under the given name.
    ///
    /// Providers may ignore `parent_id` for some kinds (script projects are
    /// forced into a default location); callers own the follow-up move.
    async fn copy_item(
        &self,
        name: &str,
        parent_id: &str,
        source_id: &str,
    ) -> Result<ItemDescriptor, ProviderError>;

    /// Re-parent an existing item.
    async fn move_item(&self, item_id: &str, new_parent_id: &str)
        -> Result<(), ProviderError>;

    /// Whether a spreadsheet is wired up as a form's response destination.
    async fn is_form_response_target(&self, spreadsheet_id: &str)
        -> Result<bool, ProviderError>;
}
