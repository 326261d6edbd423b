//! Batch orchestration: endpoint validation and the repetition loop.

use std::sync::Arc;

use tracing::{info, warn};

use crate::drive::{DriveProvider, ItemKind};

use super::error::ReplicateError;
use super::item::copy_item_to_folder;
use super::outcome::{BatchReport, CopyOutcome, IterationReport, SkipReason};
use super::resolve::resolve_reference;
use super::retry::RetryPolicy;
use super::tree::copy_folder;
use super::url::extract_drive_id;

/// Drives whole replication batches against an injected provider.
pub struct Replicator {
    provider: Arc<dyn DriveProvider>,
    retry: RetryPolicy,
}

impl Replicator {
    #[must_use]
    pub fn new(provider: Arc<dyn DriveProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Validate both endpoint references, then produce `quantity`
    /// independent replicas of the source item inside the destination
    /// folder.
    ///
    /// Nothing is mutated unless validation of quantity, source, and
    /// destination all pass. Each iteration is fully independent: a name
    /// override applies to every produced top-level replica, and one
    /// failed iteration is recorded in its report while the rest still
    /// run.
    pub async fn replicate(
        &self,
        source_url: &str,
        quantity: u32,
        destination_url: &str,
        desired_name: Option<&str>,
    ) -> Result<BatchReport, ReplicateError> {
        if quantity == 0 {
            return Err(ReplicateError::InvalidQuantity(quantity));
        }

        let source_ref =
            extract_drive_id(source_url).ok_or(ReplicateError::InvalidSourceUrl)?;
        let source = resolve_reference(self.provider.as_ref(), &self.retry, &source_ref)
            .await
            .map_err(|_| ReplicateError::SourceUnresolvable)?;

        let destination_ref =
            extract_drive_id(destination_url).ok_or(ReplicateError::InvalidDestinationUrl)?;
        let destination =
            resolve_reference(self.provider.as_ref(), &self.retry, &destination_ref)
                .await
                .map_err(|_| ReplicateError::DestinationUnresolvable)?;

        if !destination.can_edit {
            return Err(ReplicateError::DestinationNotWritable);
        }

        info!(
            source = %source.id,
            destination = %destination.id,
            kind = %source.kind,
            quantity,
            "starting replication batch"
        );

        let mut iterations = Vec::new();
        for index in 1..=quantity {
            let report = if source.kind == ItemKind::Folder {
                match copy_folder(
                    self.provider.as_ref(),
                    &self.retry,
                    &source,
                    &destination.id,
                    desired_name,
                    0,
                )
                .await
                {
                    Ok(copied) => IterationReport {
                        iteration: index,
                        root: CopyOutcome::Created {
                            source_id: source.id.clone(),
                            source_name: source.name.clone(),
                            item: copied.folder,
                        },
                        children: copied.outcomes,
                    },
                    Err(err) => {
                        warn!(iteration = index, "folder replication failed: {err}");
                        IterationReport {
                            iteration: index,
                            root: CopyOutcome::Skipped {
                                source_id: source.id.clone(),
                                source_name: source.name.clone(),
                                reason: SkipReason::ProviderFailure(err.to_string()),
                            },
                            children: Vec::new(),
                        }
                    }
                }
            } else {
                let root = copy_item_to_folder(
                    self.provider.as_ref(),
                    &self.retry,
                    &source,
                    &destination.id,
                    desired_name,
                )
                .await;
                IterationReport {
                    iteration: index,
                    root,
                    children: Vec::new(),
                }
            };
            iterations.push(report);
        }

        Ok(BatchReport { iterations })
    }
}
