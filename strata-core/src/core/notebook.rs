//! The two-level notebook/section hierarchy carried in an entry's `notebook` field.
//!
//! A raw value is either empty (no notebook), a bare notebook name, or
//! `notebook/section`. The section named [`DEFAULT_SECTION`] is never written
//! out: `"Work"` and `"Work/General"` are the same location, and
//! [`NotebookPath::to_raw`] always produces the shorter form. This makes the
//! encoding intentionally non-bijective.
//!
//! ```rust
//! use strata_core::NotebookPath;
//!
//! let path = NotebookPath::parse("Work/Ideas");
//! assert_eq!(path.notebook, "Work");
//! assert_eq!(path.section, "Ideas");
//!
//! assert_eq!(NotebookPath::parse("Work").section, "General");
//! assert_eq!(NotebookPath::new("Work", "General").to_raw(), "Work");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Section assumed when a raw path names only a notebook.
pub const DEFAULT_SECTION: &str = "General";

/// Separator between the notebook and section halves of a raw path.
pub const SEPARATOR: char = '/';

/// A decoded `(notebook, section)` location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotebookPath {
    pub notebook: String,
    pub section: String,
}

impl NotebookPath {
    pub fn new(notebook: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            notebook: notebook.into(),
            section: section.into(),
        }
    }

    /// Decodes a raw `notebook` field.
    ///
    /// Splits on the first separator only, so a section may itself contain `/`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::new("", "");
        }
        match raw.split_once(SEPARATOR) {
            None => Self::new(raw, DEFAULT_SECTION),
            Some((notebook, section)) => {
                let section = section.trim();
                Self::new(
                    notebook.trim(),
                    if section.is_empty() { DEFAULT_SECTION } else { section },
                )
            }
        }
    }

    /// Encodes back to the canonical raw form.
    pub fn to_raw(&self) -> String {
        build(&self.notebook, &self.section)
    }

    pub fn is_default_section(&self) -> bool {
        self.section.is_empty() || self.section == DEFAULT_SECTION
    }
}

/// Builds the raw path for `section` within `notebook`.
pub fn build(notebook: &str, section: &str) -> String {
    if notebook.is_empty() {
        return String::new();
    }
    if section.is_empty() || section == DEFAULT_SECTION {
        return notebook.to_string();
    }
    format!("{notebook}{SEPARATOR}{section}")
}

/// Distinct notebook names across `raws`, sorted.
pub fn list_notebooks<'a, I>(raws: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raws.into_iter()
        .map(NotebookPath::parse)
        .filter(|p| !p.notebook.is_empty())
        .map(|p| p.notebook)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct sections of `target`, sorted, with [`DEFAULT_SECTION`] first when present.
pub fn list_sections<'a, I>(raws: I, target: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections: Vec<String> = raws
        .into_iter()
        .map(NotebookPath::parse)
        .filter(|p| p.notebook == target && !p.section.is_empty())
        .map(|p| p.section)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if let Some(idx) = sections.iter().position(|s| s == DEFAULT_SECTION) {
        let general = sections.remove(idx);
        sections.insert(0, general);
    }
    sections
}
