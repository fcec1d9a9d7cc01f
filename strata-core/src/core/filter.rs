//! Sidebar visibility rules for entry lists.
//!
//! Trash dominates every other view: a trashed entry only ever appears under
//! [`EntryFilter::Trash`]. Archived entries are hidden everywhere except
//! [`EntryFilter::Archive`] and the trash.

use crate::core::notebook::NotebookPath;
use crate::EntryMeta;
use serde::{Deserialize, Serialize};

/// Which slice of the vault a list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "camelCase")]
pub enum EntryFilter {
    All,
    Pinned,
    Archive,
    Trash,
    /// Entries whose raw `notebook` field equals the given path.
    Notebook(String),
    Tag(String),
}

impl EntryFilter {
    pub fn matches(&self, entry: &EntryMeta) -> bool {
        let live = !entry.trashed && !entry.archived;
        match self {
            Self::All => live,
            Self::Pinned => entry.pinned && live,
            Self::Archive => entry.archived && !entry.trashed,
            Self::Trash => entry.trashed,
            Self::Notebook(raw) => entry.notebook == *raw && live,
            Self::Tag(tag) => entry.tags.iter().any(|t| t == tag) && live,
        }
    }

    /// Whether a notebook/section selection narrows this view further.
    fn honours_selection(&self) -> bool {
        matches!(self, Self::All | Self::Pinned | Self::Archive)
    }
}

/// The notebook (and optionally section) picked in the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchySelection {
    pub notebook: String,
    #[serde(default)]
    pub section: Option<String>,
}

impl HierarchySelection {
    pub fn matches(&self, entry: &EntryMeta) -> bool {
        let path = NotebookPath::parse(&entry.notebook);
        if path.notebook != self.notebook {
            return false;
        }
        self.section.as_ref().map_or(true, |s| path.section == *s)
    }
}

/// Entries visible under `filter`, narrowed by `selection` where it applies.
pub fn apply_filter(
    entries: &[EntryMeta],
    filter: &EntryFilter,
    selection: Option<&HierarchySelection>,
) -> Vec<EntryMeta> {
    let selection = selection.filter(|_| filter.honours_selection());
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .filter(|e| selection.map_or(true, |sel| sel.matches(e)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, notebook: &str, f: impl FnOnce(&mut EntryMeta)) -> EntryMeta {
        let mut m = EntryMeta::new(id);
        m.notebook = notebook.to_string();
        f(&mut m);
        m
    }

    fn ids(entries: &[EntryMeta]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn sample() -> Vec<EntryMeta> {
        vec![
            meta("plain", "Work", |_| {}),
            meta("pinned", "Work/Ideas", |m| m.pinned = true),
            meta("archived", "Work", |m| m.archived = true),
            meta("trashed", "Work", |m| {
                m.trashed = true;
                m.archived = true;
            }),
            meta("tagged", "Personal", |m| m.tags = vec!["home".to_string()]),
        ]
    }

    #[test]
    fn test_trash_dominates() {
        let entries = sample();
        assert_eq!(ids(&apply_filter(&entries, &EntryFilter::Trash, None)), vec!["trashed"]);
        assert_eq!(ids(&apply_filter(&entries, &EntryFilter::Archive, None)), vec!["archived"]);
    }

    #[test]
    fn test_all_pinned_tag_and_notebook() {
        let entries = sample();
        assert_eq!(
            ids(&apply_filter(&entries, &EntryFilter::All, None)),
            vec!["plain", "pinned", "tagged"]
        );
        assert_eq!(ids(&apply_filter(&entries, &EntryFilter::Pinned, None)), vec!["pinned"]);
        assert_eq!(
            ids(&apply_filter(&entries, &EntryFilter::Tag("home".to_string()), None)),
            vec!["tagged"]
        );
        assert_eq!(
            ids(&apply_filter(&entries, &EntryFilter::Notebook("Work".to_string()), None)),
            vec!["plain"]
        );
    }

    #[test]
    fn test_selection_narrows_all_but_not_tag() {
        let entries = sample();
        let work = HierarchySelection { notebook: "Work".to_string(), section: None };
        assert_eq!(
            ids(&apply_filter(&entries, &EntryFilter::All, Some(&work))),
            vec!["plain", "pinned"]
        );

        let ideas = HierarchySelection {
            notebook: "Work".to_string(),
            section: Some("Ideas".to_string()),
        };
        assert_eq!(ids(&apply_filter(&entries, &EntryFilter::All, Some(&ideas))), vec!["pinned"]);

        let general = HierarchySelection {
            notebook: "Work".to_string(),
            section: Some("General".to_string()),
        };
        assert_eq!(ids(&apply_filter(&entries, &EntryFilter::All, Some(&general))), vec!["plain"]);

        let tag = EntryFilter::Tag("home".to_string());
        assert_eq!(ids(&apply_filter(&entries, &tag, Some(&work))), vec!["tagged"]);
    }

    #[test]
    fn test_filter_wire_shape() {
        let json = serde_json::to_string(&EntryFilter::Tag("home".to_string())).unwrap();
        assert_eq!(json, r#"{"type":"tag","name":"home"}"#);
        let all: EntryFilter = serde_json::from_str(r#"{"type":"all"}"#).unwrap();
        assert_eq!(all, EntryFilter::All);
    }
}
