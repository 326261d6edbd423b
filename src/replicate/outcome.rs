//! Replication outcomes.
//!
//! Every attempted copy produces a value: a created replica or a recorded
//! skip. Batches accumulate them so nothing is silently swallowed.

use std::fmt;

use crate::drive::{ItemDescriptor, ItemKind};

/// The subset of a replica's descriptor surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
}

impl From<ItemDescriptor> for CreatedItem {
    fn from(descriptor: ItemDescriptor) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            kind: descriptor.kind,
        }
    }
}

/// Why an item was deliberately not replicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No copy permission on the source item.
    CopyPermissionDenied,
    /// The spreadsheet collects a form's responses; a copy would wire up a
    /// duplicate response relationship the provider does not replicate.
    FormLinkedSpreadsheet,
    /// The source shortcut carries no target id to point a replica at.
    ShortcutTargetMissing,
    /// The reference stopped resolving mid-traversal.
    Unresolvable,
    /// Provider calls kept failing after retries.
    ProviderFailure(String),
}

impl SkipReason {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::CopyPermissionDenied => "COPY_PERMISSION_DENIED",
            SkipReason::FormLinkedSpreadsheet => "FORM_LINKED_SPREADSHEET",
            SkipReason::ShortcutTargetMissing => "SHORTCUT_TARGET_MISSING",
            SkipReason::Unresolvable => "UNRESOLVABLE",
            SkipReason::ProviderFailure(_) => "PROVIDER_FAILURE",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CopyPermissionDenied => {
                f.write_str("no copy permission on the source item")
            }
            SkipReason::FormLinkedSpreadsheet => {
                f.write_str("spreadsheet is a form response destination")
            }
            SkipReason::ShortcutTargetMissing => {
                f.write_str("shortcut has no target id")
            }
            SkipReason::Unresolvable => f.write_str("item cannot be resolved"),
            SkipReason::ProviderFailure(msg) => write!(f, "provider failure: {msg}"),
        }
    }
}

/// Outcome of one attempted copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Created {
        source_id: String,
        source_name: String,
        item: CreatedItem,
    },
    Skipped {
        source_id: String,
        source_name: String,
        reason: SkipReason,
    },
}

impl CopyOutcome {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, CopyOutcome::Created { .. })
    }
}

/// A replicated folder subtree: the new top-level folder plus every
/// descendant outcome in traversal order.
#[derive(Debug, Clone)]
pub struct CopiedFolder {
    pub folder: CreatedItem,
    pub outcomes: Vec<CopyOutcome>,
}

/// One of the `qty` independent top-level replications of a batch.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// 1-based iteration index.
    pub iteration: u32,
    /// The top-level replica (or its failure).
    pub root: CopyOutcome,
    /// Descendant outcomes; empty in single-item mode.
    pub children: Vec<CopyOutcome>,
}

/// Everything a replication batch produced.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub iterations: Vec<IterationReport>,
}

impl BatchReport {
    /// Total replicas created across all iterations, roots included.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.iterations
            .iter()
            .map(|it| {
                let children = it.children.iter().filter(|c| c.is_created()).count();
                children.saturating_add(usize::from(it.root.is_created()))
            })
            .sum()
    }
}
