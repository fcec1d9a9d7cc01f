//! High-level operations over an open Strata vault folder.

use crate::core::notebook;
use crate::core::ordering;
use crate::core::settings::{self, AppConfig, VaultSettings, META_DIR};
use crate::{
    apply_filter, Connection, ConnectionGraph, DeleteResult, Entry, EntryFilter, EntryMeta,
    EntryStore, HierarchySelection, Result, SortUpdate, StrataError,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An open vault.
///
/// `Vault` is the contract the UI layer talks to. It wraps an [`EntryStore`]
/// (which owns the search index) and the vault's [`ConnectionGraph`].
/// Mutating methods take `&mut self`: one writer at a time is assumed, and
/// callers sharing a vault across threads must serialise access themselves.
pub struct Vault {
    root: PathBuf,
    store: EntryStore,
}

impl Vault {
    /// Opens the vault at `root`, creating its layout if needed, and warms the
    /// search index from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidVault`] if `root` exists but is not a
    /// directory, or [`StrataError::Io`] if the layout cannot be created.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() && !root.is_dir() {
            return Err(StrataError::InvalidVault(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let entries_dir = root.join("entries");
        let meta_dir = root.join(META_DIR);
        fs::create_dir_all(&entries_dir)?;
        fs::create_dir_all(&meta_dir)?;

        let connections = ConnectionGraph::new(meta_dir.join("connections.json"));
        if !connections.path().exists() {
            connections.save(&[])?;
        }
        settings::ensure_vault_settings(&root)?;

        let mut store = EntryStore::new(entries_dir, connections);
        let count = store.rebuild_index()?;
        log::info!("Opened vault {} with {count} entries", root.display());

        Ok(Self { root, store })
    }

    /// Opens the vault named by the application config, or the default location.
    pub fn open_default() -> Result<Self> {
        Self::open(settings::resolve_vault_path(&settings::load_config()))
    }

    /// Records `new_root` as the vault location in the config at `config_path`
    /// and opens it.
    pub fn set_vault_path(config_path: &Path, new_root: &Path) -> Result<Self> {
        let vault = Self::open(new_root)?;
        let config = AppConfig {
            vault_path: Some(new_root.to_path_buf()),
        };
        settings::save_config_to(config_path, &config)?;
        Ok(vault)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// The vault's settings echo, or one describing the open root if the
    /// document is missing or unreadable.
    pub fn get_settings(&self) -> VaultSettings {
        settings::load_vault_settings(&self.root).unwrap_or_else(|| VaultSettings {
            vault_path: self.root.to_string_lossy().to_string(),
        })
    }

    pub fn list_entries(&mut self) -> Result<Vec<EntryMeta>> {
        self.store.list()
    }

    pub fn read_entry(&self, id: &str) -> Option<Entry> {
        self.store.read(id)
    }

    /// Saves a full entry value and returns it as stored (with `modified`
    /// stamped and tags normalised).
    pub fn write_entry(&mut self, mut entry: Entry) -> Result<Entry> {
        self.store.write(&mut entry)?;
        Ok(entry)
    }

    /// Creates and persists an empty entry with a fresh ID.
    pub fn create_entry(&mut self, notebook: &str, tags: Vec<String>) -> Result<Entry> {
        let mut entry = Entry::new(Uuid::new_v4().to_string());
        entry.meta.notebook = notebook.to_string();
        entry.meta.tags = tags;
        self.store.write(&mut entry)?;
        Ok(entry)
    }

    /// Creates an empty entry inside `notebook/section` so the section exists.
    ///
    /// Returns `Ok(None)` when either name is blank.
    pub fn create_section(&mut self, notebook: &str, section: &str) -> Result<Option<Entry>> {
        let (notebook, section) = (notebook.trim(), section.trim());
        if notebook.is_empty() || section.is_empty() {
            return Ok(None);
        }
        let path = notebook::build(notebook, section);
        self.create_entry(&path, Vec::new()).map(Some)
    }

    pub fn archive_entry(&mut self, id: &str) -> Result<bool> {
        self.store.archive(id)
    }

    pub fn trash_entry(&mut self, id: &str) -> Result<bool> {
        self.store.trash(id)
    }

    pub fn restore_entry(&mut self, id: &str) -> Result<bool> {
        self.store.restore(id)
    }

    pub fn delete_entry_permanently(&mut self, id: &str) -> Result<DeleteResult> {
        self.store.delete(id)
    }

    pub fn pin_entry(&mut self, id: &str) -> Result<bool> {
        self.store.pin(id)
    }

    pub fn unpin_entry(&mut self, id: &str) -> Result<bool> {
        self.store.unpin(id)
    }

    /// Entries whose title or body contains `query`, ignoring case.
    ///
    /// A blank query means "no search" and returns nothing.
    pub fn search_entries(&mut self, query: &str) -> Result<Vec<EntryMeta>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let metas = self.store.list()?;
        let hits = self.store.index().search(query);
        Ok(metas.into_iter().filter(|m| hits.contains(&m.id)).collect())
    }

    /// Distinct notebook names, sorted.
    pub fn list_notebooks(&mut self) -> Result<Vec<String>> {
        let metas = self.store.list()?;
        Ok(notebook::list_notebooks(metas.iter().map(|m| m.notebook.as_str())))
    }

    /// Sections of `notebook`, sorted, with `General` first when present.
    pub fn list_sections(&mut self, notebook: &str) -> Result<Vec<String>> {
        let metas = self.store.list()?;
        Ok(notebook::list_sections(
            metas.iter().map(|m| m.notebook.as_str()),
            notebook,
        ))
    }

    /// Distinct tags across all entries, sorted.
    pub fn list_tags(&mut self) -> Result<Vec<String>> {
        let metas = self.store.list()?;
        let tags: BTreeSet<String> = metas.into_iter().flat_map(|m| m.tags).collect();
        Ok(tags.into_iter().collect())
    }

    pub fn get_connections(&self) -> Vec<Connection> {
        self.store.connections().load()
    }

    pub fn add_connection(&mut self, connection: Connection) -> Result<bool> {
        self.store.connections().add(connection)
    }

    pub fn remove_connection(&mut self, from: &str, to: &str) -> Result<bool> {
        self.store.connections().remove(from, to)
    }

    /// Renames a section of `notebook`, returning how many entries moved.
    pub fn rename_section(
        &mut self,
        notebook: &str,
        old_section: &str,
        new_section: &str,
    ) -> Result<usize> {
        self.store
            .rename_section(notebook.trim(), old_section.trim(), new_section.trim())
    }

    /// Applies manual positions; IDs that no longer exist are skipped.
    ///
    /// Returns how many entries were rewritten.
    pub fn reorder_entries(&mut self, updates: &[SortUpdate]) -> Result<usize> {
        let mut written = 0;
        for update in updates {
            if self.store.set_sort_order(&update.id, Some(update.sort_order))? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Renumbers `ids` in the given order and persists the new positions.
    pub fn reorder_by_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<SortUpdate>> {
        let updates = ordering::reorder(ids);
        self.reorder_entries(&updates)?;
        Ok(updates)
    }

    /// The entries a sidebar view shows, in display order.
    pub fn list_view(
        &mut self,
        filter: &EntryFilter,
        selection: Option<&HierarchySelection>,
    ) -> Result<Vec<EntryMeta>> {
        let metas = self.store.list()?;
        let mut visible = apply_filter(&metas, filter, selection);
        ordering::sort_for_display(&mut visible);
        Ok(visible)
    }
}
