//! In-memory drive backend.
//!
//! Doubles as the daemon's default backend and the test fixture. It
//! emulates the provider quirks the replication core's special cases exist
//! for: trashed items never show up in listings, copying a script project
//! lands the replica in the root location regardless of the requested
//! parent, and spreadsheets can be flagged as form-response targets.
//!
//! For tests it additionally records every mutating call and can be told
//! to fail the next N invocations of a given operation.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::kind::ItemKind;
use super::provider::{DriveProvider, ProviderError};
use super::types::ItemDescriptor;

/// Seed data for one stored item. `parent: None` places it at the root.
#[derive(Debug, Clone)]
pub struct SeedItem {
    pub name: String,
    pub kind: ItemKind,
    pub parent: Option<String>,
    pub can_copy: bool,
    pub can_edit: bool,
    pub shortcut_target_id: Option<String>,
    pub trashed: bool,
}

impl Default for SeedItem {
    fn default() -> Self {
        Self {
            name: "item".to_string(),
            kind: ItemKind::File,
            parent: None,
            can_copy: true,
            can_edit: true,
            shortcut_target_id: None,
            trashed: false,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredItem {
    name: String,
    kind: ItemKind,
    parent: Option<String>,
    can_copy: bool,
    can_edit: bool,
    shortcut_target_id: Option<String>,
    trashed: bool,
}

impl StoredItem {
    fn descriptor(&self, id: &str) -> ItemDescriptor {
        ItemDescriptor {
            id: id.to_string(),
            name: self.name.clone(),
            kind: self.kind,
            can_copy: self.can_copy,
            can_edit: self.can_edit,
            shortcut_target_id: self.shortcut_target_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct FailurePlan {
    /// Calls to let through before failing starts.
    skip: u32,
    /// Forced failures after the skip window.
    fail: u32,
}

#[derive(Default)]
struct State {
    items: HashMap<String, StoredItem>,
    form_targets: HashSet<String>,
    planned_failures: HashMap<&'static str, FailurePlan>,
    mutation_log: Vec<String>,
}

impl State {
    /// Consume one step of the failure plan for `op`, if any.
    fn take_failure(&mut self, op: &'static str) -> Result<(), ProviderError> {
        if let Some(plan) = self.planned_failures.get_mut(op) {
            if plan.skip > 0 {
                plan.skip = plan.skip.saturating_sub(1);
                return Ok(());
            }
            if plan.fail > 0 {
                plan.fail = plan.fail.saturating_sub(1);
                return Err(ProviderError::failure(format!("injected {op} fault")));
            }
        }
        Ok(())
    }
}

/// A `DriveProvider` backed by a process-local item table.
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an item and return its generated id.
    pub fn seed(&self, item: SeedItem) -> String {
        let id = Self::next_id();
        self.lock().items.insert(
            id.clone(),
            StoredItem {
                name: item.name,
                kind: item.kind,
                parent: item.parent,
                can_copy: item.can_copy,
                can_edit: item.can_edit,
                shortcut_target_id: item.shortcut_target_id,
                trashed: item.trashed,
            },
        );
        id
    }

    /// Convenience: seed a writable folder.
    pub fn add_folder(&self, name: &str, parent: Option<&str>) -> String {
        self.seed(SeedItem {
            name: name.to_string(),
            kind: ItemKind::Folder,
            parent: parent.map(ToString::to_string),
            ..SeedItem::default()
        })
    }

    /// Convenience: seed a copyable file.
    pub fn add_file(&self, name: &str, parent: Option<&str>) -> String {
        self.seed(SeedItem {
            name: name.to_string(),
            parent: parent.map(ToString::to_string),
            ..SeedItem::default()
        })
    }

    /// Flag a spreadsheet as some form's response destination.
    pub fn mark_form_response_target(&self, id: &str) {
        self.lock().form_targets.insert(id.to_string());
    }

    /// Make the next `times` invocations of `op` fail with a retryable
    /// provider fault. `op` is the trait method name.
    pub fn fail_next(&self, op: &'static str, times: u32) {
        self.fail_after(op, 0, times);
    }

    /// Let `successes` invocations of `op` through, then fail the following
    /// `times` invocations with a retryable provider fault.
    pub fn fail_after(&self, op: &'static str, successes: u32, times: u32) {
        self.lock().planned_failures.insert(
            op,
            FailurePlan {
                skip: successes,
                fail: times,
            },
        );
    }

    /// Look up an item's current descriptor without going through the port.
    #[must_use]
    pub fn descriptor(&self, id: &str) -> Option<ItemDescriptor> {
        self.lock().items.get(id).map(|item| item.descriptor(id))
    }

    /// Current parent of an item; `None` for root-placed or unknown ids.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.lock().items.get(id).and_then(|item| item.parent.clone())
    }

    /// All non-trashed items directly under `parent_id`.
    #[must_use]
    pub fn items_under(&self, parent_id: &str) -> Vec<ItemDescriptor> {
        self.lock()
            .items
            .iter()
            .filter(|(_, item)| {
                !item.trashed && item.parent.as_deref() == Some(parent_id)
            })
            .map(|(id, item)| item.descriptor(id))
            .collect()
    }

    /// Every mutating provider call made so far, in order, as
    /// `"<op>:<principal argument>"`.
    #[must_use]
    pub fn mutation_log(&self) -> Vec<String> {
        self.lock().mutation_log.clone()
    }
}

#[async_trait]
impl DriveProvider for MemoryProvider {
    async fn resolve(&self, id: &str) -> Result<ItemDescriptor, ProviderError> {
        let mut state = self.lock();
        state.take_failure("resolve")?;
        state
            .items
            .get(id)
            .map(|item| item.descriptor(id))
            .ok_or_else(|| ProviderError::unresolvable(id))
    }

    async fn list_children(
        &self,
        folder_id: &str,
    ) -> Result<Vec<ItemDescriptor>, ProviderError> {
        let mut state = self.lock();
        state.take_failure("list_children")?;
        if !state.items.contains_key(folder_id) {
            return Err(ProviderError::unresolvable(folder_id));
        }
        Ok(state
            .items
            .iter()
            .filter(|(_, item)| {
                !item.trashed && item.parent.as_deref() == Some(folder_id)
            })
            .map(|(id, item)| item.descriptor(id))
            .collect())
    }

    async fn create_folder(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<ItemDescriptor, ProviderError> {
        let mut state = self.lock();
        state.take_failure("create_folder")?;
        if !state.items.contains_key(parent_id) {
            return Err(ProviderError::unresolvable(parent_id));
        }
        let id = Self::next_id();
        let item = StoredItem {
            name: name.to_string(),
            kind: ItemKind::Folder,
            parent: Some(parent_id.to_string()),
            can_copy: true,
            can_edit: true,
            shortcut_target_id: None,
            trashed: false,
        };
        let descriptor = item.descriptor(&id);
        state.items.insert(id, item);
        state.mutation_log.push(format!("create_folder:{name}"));
        Ok(descriptor)
    }

    async fn create_shortcut(
        &self,
        name: &str,
        parent_id: &str,
        target_id: &str,
    ) -> Result<ItemDescriptor, ProviderError> {
        let mut state = self.lock();
        state.take_failure("create_shortcut")?;
        if !state.items.contains_key(parent_id) {
            return Err(ProviderError::unresolvable(parent_id));
        }
        let id = Self::next_id();
        let item = StoredItem {
            name: name.to_string(),
            kind: ItemKind::Shortcut,
            parent: Some(parent_id.to_string()),
            can_copy: true,
            can_edit: true,
            shortcut_target_id: Some(target_id.to_string()),
            trashed: false,
        };
        let descriptor = item.descriptor(&id);
        state.items.insert(id, item);
        state
            .mutation_log
            .push(format!("create_shortcut:{target_id}"));
        Ok(descriptor)
    }

    async fn copy_item(
        &self,
        name: &str,
        parent_id: &str,
        source_id: &str,
    ) -> Result<ItemDescriptor, ProviderError> {
        let mut state = self.lock();
        state.take_failure("copy_item")?;
        let source = state
            .items
            .get(source_id)
            .ok_or_else(|| ProviderError::unresolvable(source_id))?
            .clone();
        if source.kind == ItemKind::Folder {
            return Err(ProviderError::failure("folders cannot be copied directly"));
        }
        // Script-project copies are forced into the root location no matter
        // which parent was requested, as the real provider does.
        let parent = if source.kind == ItemKind::ScriptProject {
            None
        } else {
            Some(parent_id.to_string())
        };
        let id = Self::next_id();
        let item = StoredItem {
            name: name.to_string(),
            kind: source.kind,
            parent,
            can_copy: true,
            can_edit: true,
            shortcut_target_id: None,
            trashed: false,
        };
        let descriptor = item.descriptor(&id);
        state.items.insert(id, item);
        state.mutation_log.push(format!("copy_item:{source_id}"));
        Ok(descriptor)
    }

    async fn move_item(
        &self,
        item_id: &str,
        new_parent_id: &str,
    ) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.take_failure("move_item")?;
        if !state.items.contains_key(new_parent_id) {
            return Err(ProviderError::unresolvable(new_parent_id));
        }
        let item = state
            .items
            .get_mut(item_id)
            .ok_or_else(|| ProviderError::unresolvable(item_id))?;
        item.parent = Some(new_parent_id.to_string());
        state.mutation_log.push(format!("move_item:{item_id}"));
        Ok(())
    }

    async fn is_form_response_target(
        &self,
        spreadsheet_id: &str,
    ) -> Result<bool, ProviderError> {
        let mut state = self.lock();
        state.take_failure("is_form_response_target")?;
        Ok(state.form_targets.contains(spreadsheet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_unknown_id_is_unresolvable() {
        let provider = MemoryProvider::new();
        let err = provider.resolve("missing").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unresolvable(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_list_children_excludes_trashed() {
        let provider = MemoryProvider::new();
        let folder = provider.add_folder("parent", None);
        provider.add_file("kept", Some(&folder));
        provider.seed(SeedItem {
            name: "binned".to_string(),
            parent: Some(folder.clone()),
            trashed: true,
            ..SeedItem::default()
        });

        let children = provider.list_children(&folder).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "kept");
    }

    #[tokio::test]
    async fn test_copy_script_project_lands_in_root() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let script = provider.seed(SeedItem {
            name: "automation".to_string(),
            kind: ItemKind::ScriptProject,
            ..SeedItem::default()
        });

        let copied = provider.copy_item("automation", &dest, &script).await.unwrap();
        assert_eq!(provider.parent_of(&copied.id), None);

        provider.move_item(&copied.id, &dest).await.unwrap();
        assert_eq!(provider.parent_of(&copied.id), Some(dest));
    }

    #[tokio::test]
    async fn test_copying_a_folder_directly_is_rejected() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let folder = provider.add_folder("src", None);
        let err = provider.copy_item("src", &dest, &folder).await.unwrap_err();
        assert!(err.is_retryable(), "rejection is a generic provider fault");
    }

    #[tokio::test]
    async fn test_fail_next_injects_bounded_faults() {
        let provider = MemoryProvider::new();
        let file = provider.add_file("doc", None);
        provider.fail_next("resolve", 2);

        assert!(provider.resolve(&file).await.is_err());
        assert!(provider.resolve(&file).await.is_err());
        assert!(provider.resolve(&file).await.is_ok());
    }

    #[tokio::test]
    async fn test_mutation_log_records_copies() {
        let provider = MemoryProvider::new();
        let dest = provider.add_folder("dest", None);
        let file = provider.add_file("doc", Some(&dest));
        provider.copy_item("doc", &dest, &file).await.unwrap();

        let log = provider.mutation_log();
        assert_eq!(log, vec![format!("copy_item:{file}")]);
    }
}
