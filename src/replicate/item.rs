//! Single-item replication with per-kind dispatch.

use tracing::{info, warn};

use crate::drive::{DriveProvider, ItemDescriptor, ItemKind, ProviderError};

use super::outcome::{CopyOutcome, SkipReason};
use super::retry::RetryPolicy;

/// Copy one non-folder item into `dest_folder_id`.
///
/// Infallible: every failure mode is recorded as a skip outcome
/// so tree traversal and batch loops continue past it. Exactly one
/// provider object is created per call, or zero on a skip.
pub async fn copy_item_to_folder(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    source: &ItemDescriptor,
    dest_folder_id: &str,
    desired_name: Option<&str>,
) -> CopyOutcome {
    if !source.can_copy {
        info!(id = %source.id, name = %source.name, "skipping item without copy permission");
        return skip(source, SkipReason::CopyPermissionDenied);
    }

    let name = desired_name.unwrap_or(&source.name);

    match source.kind {
        ItemKind::Shortcut => recreate_shortcut(provider, retry, source, dest_folder_id).await,
        ItemKind::Spreadsheet => {
            copy_spreadsheet(provider, retry, source, dest_folder_id, name).await
        }
        ItemKind::ScriptProject => {
            copy_script_project(provider, retry, source, dest_folder_id, name).await
        }
        ItemKind::File | ItemKind::Other => {
            generic_copy(provider, retry, source, dest_folder_id, name).await
        }
        ItemKind::Folder => {
            // Folders belong to the tree replicator; reaching here is a
            // caller bug, recorded rather than panicked on.
            warn!(id = %source.id, "folder handed to the item replicator");
            skip(
                source,
                SkipReason::ProviderFailure(
                    "folders are replicated by the tree replicator".to_string(),
                ),
            )
        }
    }
}

/// Re-create a shortcut pointing at the *original* target, never at a copy
/// of it, and always named after the source shortcut; a requested name
/// override does not apply to shortcuts.
async fn recreate_shortcut(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    source: &ItemDescriptor,
    dest_folder_id: &str,
) -> CopyOutcome {
    let Some(target_id) = source.shortcut_target_id.as_deref() else {
        warn!(id = %source.id, "shortcut has no target id");
        return skip(source, SkipReason::ShortcutTargetMissing);
    };

    match retry
        .run("create_shortcut", || {
            provider.create_shortcut(&source.name, dest_folder_id, target_id)
        })
        .await
    {
        Ok(created) => created_outcome(source, created),
        Err(err) => {
            warn!(id = %source.id, "shortcut re-creation failed: {err}");
            skip(source, reason_for(err))
        }
    }
}

/// Spreadsheets that collect a form's responses are skipped: copying one
/// would wire up a duplicate response relationship the provider does not
/// replicate correctly.
async fn copy_spreadsheet(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    source: &ItemDescriptor,
    dest_folder_id: &str,
    name: &str,
) -> CopyOutcome {
    match retry
        .run("is_form_response_target", || {
            provider.is_form_response_target(&source.id)
        })
        .await
    {
        Ok(true) => {
            info!(id = %source.id, name = %source.name, "skipping form-linked spreadsheet");
            skip(source, SkipReason::FormLinkedSpreadsheet)
        }
        Ok(false) => generic_copy(provider, retry, source, dest_folder_id, name).await,
        Err(err) => {
            warn!(id = %source.id, "form-link check failed: {err}");
            skip(source, reason_for(err))
        }
    }
}

/// The provider forces script-project copies into its default location
/// regardless of the requested parent; an explicit move after the copy is
/// mandatory.
async fn copy_script_project(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    source: &ItemDescriptor,
    dest_folder_id: &str,
    name: &str,
) -> CopyOutcome {
    let created = match retry
        .run("copy_item", || {
            provider.copy_item(name, dest_folder_id, &source.id)
        })
        .await
    {
        Ok(created) => created,
        Err(err) => {
            warn!(id = %source.id, "script project copy failed: {err}");
            return skip(source, reason_for(err));
        }
    };

    if let Err(err) = retry
        .run("move_item", || {
            provider.move_item(&created.id, dest_folder_id)
        })
        .await
    {
        warn!(id = %created.id, "script replica created but not relocated: {err}");
        return skip(
            source,
            SkipReason::ProviderFailure(format!(
                "replica {} created but left in the provider default location: {err}",
                created.id
            )),
        );
    }

    created_outcome(source, created)
}

async fn generic_copy(
    provider: &dyn DriveProvider,
    retry: &RetryPolicy,
    source: &ItemDescriptor,
    dest_folder_id: &str,
    name: &str,
) -> CopyOutcome {
    match retry
        .run("copy_item", || {
            provider.copy_item(name, dest_folder_id, &source.id)
        })
        .await
    {
        Ok(created) => created_outcome(source, created),
        Err(err) => {
            warn!(id = %source.id, name = %source.name, "copy failed: {err}");
            skip(source, reason_for(err))
        }
    }
}

fn skip(source: &ItemDescriptor, reason: SkipReason) -> CopyOutcome {
    CopyOutcome::Skipped {
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        reason,
    }
}

fn created_outcome(source: &ItemDescriptor, created: ItemDescriptor) -> CopyOutcome {
    info!(source = %source.id, replica = %created.id, kind = %created.kind, "created replica");
    CopyOutcome::Created {
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        item: created.into(),
    }
}

fn reason_for(err: ProviderError) -> SkipReason {
    match err {
        ProviderError::Unresolvable(_) => SkipReason::Unresolvable,
        ProviderError::Failure(msg) => SkipReason::ProviderFailure(msg),
    }
}
