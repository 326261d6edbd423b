//! Item kind classification.
//!
//! The provider reports item types as MIME strings; the core dispatches on
//! a closed enum so new kinds are a compile-time-checked addition.

use std::fmt;

pub const MIME_FOLDER: &str = "application/vnd.google-apps.folder";
pub const MIME_SHORTCUT: &str = "application/vnd.google-apps.shortcut";
pub const MIME_SPREADSHEET: &str = "application/vnd.google-apps.spreadsheet";
pub const MIME_SCRIPT_PROJECT: &str = "application/vnd.google-apps.script";

/// The item kinds the replicator distinguishes.
///
/// `File` and `Other` both take the generic-copy path; they differ only in
/// whether the provider reported a usable MIME type at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    File,
    Folder,
    Shortcut,
    ScriptProject,
    Spreadsheet,
    Other,
}

impl ItemKind {
    /// Classify a provider MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim() {
            "" => ItemKind::Other,
            MIME_FOLDER => ItemKind::Folder,
            MIME_SHORTCUT => ItemKind::Shortcut,
            MIME_SPREADSHEET => ItemKind::Spreadsheet,
            MIME_SCRIPT_PROJECT => ItemKind::ScriptProject,
            _ => ItemKind::File,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::File => "FILE",
            ItemKind::Folder => "FOLDER",
            ItemKind::Shortcut => "SHORTCUT",
            ItemKind::ScriptProject => "SCRIPT_PROJECT",
            ItemKind::Spreadsheet => "SPREADSHEET",
            ItemKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_special_kinds() {
        assert_eq!(ItemKind::from_mime(MIME_FOLDER), ItemKind::Folder);
        assert_eq!(ItemKind::from_mime(MIME_SHORTCUT), ItemKind::Shortcut);
        assert_eq!(ItemKind::from_mime(MIME_SPREADSHEET), ItemKind::Spreadsheet);
        assert_eq!(ItemKind::from_mime(MIME_SCRIPT_PROJECT), ItemKind::ScriptProject);
    }

    #[test]
    fn test_from_mime_unrecognized_is_file() {
        assert_eq!(ItemKind::from_mime("application/pdf"), ItemKind::File);
        assert_eq!(
            ItemKind::from_mime("application/vnd.google-apps.document"),
            ItemKind::File
        );
    }

    #[test]
    fn test_from_mime_empty_is_other() {
        assert_eq!(ItemKind::from_mime(""), ItemKind::Other);
        assert_eq!(ItemKind::from_mime("   "), ItemKind::Other);
    }

    #[test]
    fn test_as_str_round_trip_labels() {
        assert_eq!(ItemKind::ScriptProject.as_str(), "SCRIPT_PROJECT");
        assert_eq!(ItemKind::Folder.to_string(), "FOLDER");
    }
}
