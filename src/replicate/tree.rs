//! Recursive folder replication.

use futures::future::BoxFuture;
use futures::FutureExt as _;
use tracing::{debug, warn};

use crate::drive::{DriveProvider, ItemDescriptor, ItemKind, ProviderError};

use super::error::ReplicateError;
use super::item::copy_item_to_folder;
use super::outcome::{CopiedFolder, CopyOutcome, SkipReason};
use super::retry::RetryPolicy;

/// Replicate the folder `source` into `dest_folder_id`, depth-first and
/// strictly sequential: when this returns, the whole subtree replica is
/// fully populated.
///
/// `desired_name` applies only at depth 0; every level below inherits the
/// source folder's name verbatim. A failed child is recorded as an outcome
/// and traversal continues with its siblings; failing to create or
/// enumerate the replica folder itself is fatal to this subtree and
/// propagates to the caller.
pub fn copy_folder<'a>(
    provider: &'a dyn DriveProvider,
    retry: &'a RetryPolicy,
    source: &'a ItemDescriptor,
    dest_folder_id: &'a str,
    desired_name: Option<&'a str>,
    depth: u32,
) -> BoxFuture<'a, Result<CopiedFolder, ReplicateError>> {
    async move {
        let name = if depth == 0 {
            desired_name.unwrap_or(&source.name)
        } else {
            &source.name
        };

        // The replica folder must exist before any child can be placed in
        // it; without it the subtree is unbuildable.
        let created = retry
            .run("create_folder", || {
                provider.create_folder(name, dest_folder_id)
            })
            .await?;
        let children = retry
            .run("list_children", || provider.list_children(&source.id))
            .await?;

        debug!(
            source = %source.id,
            replica = %created.id,
            depth,
            child_count = children.len(),
            "replicating folder"
        );

        let mut outcomes = Vec::new();
        for child in &children {
            if child.kind == ItemKind::Folder {
                match copy_folder(
                    provider,
                    retry,
                    child,
                    &created.id,
                    None,
                    depth.saturating_add(1),
                )
                .await
                {
                    Ok(sub) => {
                        outcomes.push(CopyOutcome::Created {
                            source_id: child.id.clone(),
                            source_name: child.name.clone(),
                            item: sub.folder,
                        });
                        outcomes.extend(sub.outcomes);
                    }
                    Err(err) => {
                        warn!(
                            id = %child.id,
                            name = %child.name,
                            depth,
                            "sub-folder replication failed: {err}"
                        );
                        outcomes.push(CopyOutcome::Skipped {
                            source_id: child.id.clone(),
                            source_name: child.name.clone(),
                            reason: subtree_skip_reason(&err),
                        });
                    }
                }
            } else {
                outcomes
                    .push(copy_item_to_folder(provider, retry, child, &created.id, None).await);
            }
        }

        Ok(CopiedFolder {
            folder: created.into(),
            outcomes,
        })
    }
    .boxed()
}

fn subtree_skip_reason(err: &ReplicateError) -> SkipReason {
    match err {
        ReplicateError::Provider(ProviderError::Unresolvable(_)) => SkipReason::Unresolvable,
        other => SkipReason::ProviderFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::MemoryProvider;
    use std::time::Duration;

    fn instant_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    async fn folder_descriptor(provider: &MemoryProvider, id: &str) -> ItemDescriptor {
        provider.resolve(id).await.unwrap()
    }

    #[tokio::test]
    async fn test_replica_folder_is_created_before_children() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let src = provider.add_folder("album", None);
        provider.add_file("one", Some(&src));
        let source = folder_descriptor(&provider, &src).await;

        copy_folder(&provider, &instant_retry(), &source, &dest, None, 0)
            .await
            .unwrap();

        let log = provider.mutation_log();
        assert_eq!(log.first().map(String::as_str), Some("create_folder:album"));
    }

    #[tokio::test]
    async fn test_descendant_names_are_inherited_verbatim() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let src = provider.add_folder("album", None);
        let sub = provider.add_folder("inner", Some(&src));
        provider.add_file("song", Some(&sub));
        let source = folder_descriptor(&provider, &src).await;

        let copied = copy_folder(
            &provider,
            &instant_retry(),
            &source,
            &dest,
            Some("renamed"),
            0,
        )
        .await
        .unwrap();

        assert_eq!(copied.folder.name, "renamed");
        let names: Vec<String> = copied
            .outcomes
            .iter()
            .filter_map(|o| match o {
                CopyOutcome::Created { item, .. } => Some(item.name.clone()),
                CopyOutcome::Skipped { .. } => None,
            })
            .collect();
        assert!(names.contains(&"inner".to_string()));
        assert!(names.contains(&"song".to_string()));
        assert!(!names.contains(&"renamed".to_string()));
    }

    #[tokio::test]
    async fn test_container_creation_failure_is_fatal() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let src = provider.add_folder("album", None);
        let source = folder_descriptor(&provider, &src).await;
        provider.fail_next("create_folder", 10);

        let result =
            copy_folder(&provider, &instant_retry(), &source, &dest, None, 0).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_child_does_not_abort_siblings() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let src = provider.add_folder("album", None);
        provider.add_file("a", Some(&src));
        provider.add_file("b", Some(&src));
        let source = folder_descriptor(&provider, &src).await;
        // One child copy fails past the retry budget; the other succeeds.
        provider.fail_next("copy_item", 2);

        let copied = copy_folder(&provider, &instant_retry(), &source, &dest, None, 0)
            .await
            .unwrap();

        let created = copied.outcomes.iter().filter(|o| o.is_created()).count();
        let skipped = copied.outcomes.len() - created;
        assert_eq!(created, 1);
        assert_eq!(skipped, 1);
    }
}
