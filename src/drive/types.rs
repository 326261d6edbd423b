//! Read-only snapshots of provider item metadata.

use super::kind::ItemKind;

/// Opaque provider-assigned identifier, extracted from a URL.
///
/// Never constructed by hand outside the identifier extractor; immutable
/// once obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    id: String,
}

impl ResourceRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

/// Snapshot of an item's metadata and permissions.
///
/// Produced by the metadata resolver; not kept in sync with the provider
/// after the fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub can_copy: bool,
    pub can_edit: bool,
    /// Target of a shortcut item; `None` for every other kind.
    pub shortcut_target_id: Option<String>,
}
