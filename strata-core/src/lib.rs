//! Core library for Strata: vault persistence and indexing for a local-first
//! note-taking application.
//!
//! The primary entry point is [`Vault`], which represents an open vault folder:
//! one Markdown file with YAML frontmatter per entry under `entries/`, plus a
//! `.strata/` directory holding the connection graph and a settings echo.
//! All mutations go through `Vault` methods.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use self::core::{
    connections::{Connection, ConnectionGraph, ConnectionsDocument},
    delete::DeleteResult,
    entry::{normalise_tags, Entry, EntryMeta, Pressure, Structure, DEFAULT_TITLE},
    error::{Result, StrataError},
    filter::{apply_filter, EntryFilter, HierarchySelection},
    frontmatter::{decode, encode, Decoded},
    notebook::{list_notebooks, list_sections, NotebookPath, DEFAULT_SECTION},
    ordering::{display_order, reorder, sort_for_display, SortUpdate},
    search_index::SearchIndex,
    settings::{AppConfig, VaultSettings},
    storage::EntryStore,
    vault::Vault,
};
