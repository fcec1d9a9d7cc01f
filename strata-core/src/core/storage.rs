//! File-backed entry persistence: one `<id>.md` file per entry.

use crate::core::connections::ConnectionGraph;
use crate::core::entry::normalise_tags;
use crate::core::frontmatter;
use crate::core::notebook;
use crate::{DeleteResult, Entry, EntryMeta, Result, SearchIndex, StrataError};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of entry files.
pub const ENTRY_EXTENSION: &str = "md";

/// Extension of the temporary file a write goes through before the rename.
const STAGED_EXTENSION: &str = "md.tmp";

/// The authoritative collection of entries in a vault's `entries/` directory.
///
/// The store owns the [`SearchIndex`] and keeps it in step with every listing,
/// write and delete. It also holds the vault's [`ConnectionGraph`] so that
/// deleting an entry can drop the links that mention it.
pub struct EntryStore {
    entries_dir: PathBuf,
    index: SearchIndex,
    connections: ConnectionGraph,
}

impl EntryStore {
    pub fn new(entries_dir: impl Into<PathBuf>, connections: ConnectionGraph) -> Self {
        Self {
            entries_dir: entries_dir.into(),
            index: SearchIndex::new(),
            connections,
        }
    }

    pub fn entries_dir(&self) -> &Path {
        &self.entries_dir
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    /// Path of the file backing `id`, or `None` if `id` is not a safe file stem.
    pub fn entry_path(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.entries_dir.join(format!("{id}.{ENTRY_EXTENSION}")))
    }

    /// Lists the metadata of every readable entry, in file-name order.
    ///
    /// Unreadable files are skipped with a warning so one corrupt note never
    /// hides the rest. The search index is synchronised with the result:
    /// listed entries are refreshed and IDs that no longer exist are evicted.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] only if the entries directory exists but
    /// cannot be enumerated.
    pub fn list(&mut self) -> Result<Vec<EntryMeta>> {
        let loaded = self.scan()?;

        let mut metas = Vec::with_capacity(loaded.len());
        let mut seen = HashSet::with_capacity(loaded.len());
        for file in loaded {
            self.index
                .update(&file.entry.meta.id, file.indexed_title(), &file.entry.body);
            seen.insert(file.entry.meta.id.clone());
            metas.push(file.entry.meta);
        }

        let evicted = self.index.retain_ids(&seen);
        if evicted > 0 {
            log::debug!("Evicted {evicted} stale search index entries");
        }
        Ok(metas)
    }

    /// Decodes every `*.md` file in the entries directory, in file-name order.
    fn scan(&self) -> Result<Vec<LoadedEntry>> {
        let read_dir = match fs::read_dir(&self.entries_dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == ENTRY_EXTENSION))
            .collect();
        paths.sort();

        Ok(paths.iter().filter_map(|p| load_entry_file(p)).collect())
    }

    /// Reads one entry including its body; `None` if it does not exist or
    /// cannot be read.
    pub fn read(&self, id: &str) -> Option<Entry> {
        let path = self.entry_path(id)?;
        if !path.is_file() {
            return None;
        }
        load_entry_file(&path).map(|file| file.entry)
    }

    /// Persists `entry`, stamping `modified` and normalising its tags first.
    ///
    /// The text is staged next to the target and renamed over it, so a failed
    /// write leaves the previous file intact. The caller's value is updated in
    /// place so it matches what was written.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidEntryId`] if the ID cannot name a file,
    /// or [`StrataError::Io`] / [`StrataError::Yaml`] if persisting fails.
    pub fn write(&mut self, entry: &mut Entry) -> Result<()> {
        let path = self
            .entry_path(&entry.meta.id)
            .ok_or_else(|| StrataError::InvalidEntryId(entry.meta.id.clone()))?;

        entry.meta.modified = Utc::now();
        entry.meta.tags = normalise_tags(&entry.meta.tags);
        let text = frontmatter::encode(entry)?;

        fs::create_dir_all(&self.entries_dir)?;
        let staged = path.with_extension(STAGED_EXTENSION);
        fs::write(&staged, text)?;
        if let Err(e) = fs::rename(&staged, &path) {
            fs::remove_file(&staged).ok();
            return Err(e.into());
        }

        self.index.update(&entry.meta.id, &entry.meta.title, &entry.body);
        Ok(())
    }

    /// Removes `id` from disk, the search index and the connection graph.
    ///
    /// Deleting an entry that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] if the file exists but cannot be removed,
    /// or the connection document cannot be rewritten.
    pub fn delete(&mut self, id: &str) -> Result<DeleteResult> {
        let mut file_removed = false;
        if let Some(path) = self.entry_path(id) {
            match fs::remove_file(&path) {
                Ok(()) => file_removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.index.remove(id);
        let connections_removed = self.connections.remove_all_for(id)?;

        Ok(DeleteResult {
            file_removed,
            connections_removed,
        })
    }

    /// Reads `id`, applies `change`, and writes it back.
    ///
    /// Returns `Ok(false)` without writing if the entry does not exist.
    pub fn update_with<F>(&mut self, id: &str, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Entry),
    {
        let Some(mut entry) = self.read(id) else {
            return Ok(false);
        };
        change(&mut entry);
        self.write(&mut entry)?;
        Ok(true)
    }

    pub fn archive(&mut self, id: &str) -> Result<bool> {
        self.update_with(id, |e| e.meta.archived = true)
    }

    pub fn trash(&mut self, id: &str) -> Result<bool> {
        self.update_with(id, |e| e.meta.trashed = true)
    }

    /// Brings an entry back from both the trash and the archive.
    pub fn restore(&mut self, id: &str) -> Result<bool> {
        self.update_with(id, |e| {
            e.meta.trashed = false;
            e.meta.archived = false;
        })
    }

    pub fn pin(&mut self, id: &str) -> Result<bool> {
        self.update_with(id, |e| e.meta.pinned = true)
    }

    pub fn unpin(&mut self, id: &str) -> Result<bool> {
        self.update_with(id, |e| e.meta.pinned = false)
    }

    pub fn set_sort_order(&mut self, id: &str, sort_order: Option<f64>) -> Result<bool> {
        self.update_with(id, |e| e.meta.sort_order = sort_order)
    }

    /// Replaces the search index with the contents of every readable entry.
    pub fn rebuild_index(&mut self) -> Result<usize> {
        let loaded = self.scan()?;
        let count = loaded.len();
        self.index.rebuild(
            loaded
                .iter()
                .map(|f| (f.entry.meta.id.as_str(), f.indexed_title(), f.entry.body.as_str())),
        );
        log::debug!("Search index rebuilt with {count} entries");
        Ok(count)
    }

    /// Moves every entry in `notebook/old_section` to `notebook/new_section`.
    ///
    /// Entries are rewritten one at a time; there is no rollback. If a write
    /// fails part-way the error is returned as
    /// [`StrataError::CascadeInterrupted`] carrying the number of entries
    /// already moved.
    pub fn rename_section(
        &mut self,
        notebook: &str,
        old_section: &str,
        new_section: &str,
    ) -> Result<usize> {
        let old_path = notebook::build(notebook, old_section);
        let new_path = notebook::build(notebook, new_section);
        if old_path == new_path {
            return Ok(0);
        }

        let targets: Vec<String> = self
            .list()?
            .into_iter()
            .filter(|m| m.notebook == old_path)
            .map(|m| m.id)
            .collect();

        let mut rewritten = 0;
        for id in &targets {
            let moved = self.update_with(id, |e| e.meta.notebook = new_path.clone());
            match moved {
                Ok(true) => rewritten += 1,
                Ok(false) => {}
                Err(e) => {
                    return Err(StrataError::CascadeInterrupted {
                        rewritten,
                        source: Box::new(e),
                    })
                }
            }
        }

        log::info!("Renamed section {old_path:?} to {new_path:?} across {rewritten} entries");
        Ok(rewritten)
    }
}

/// `true` if `id` can be used verbatim as a file stem inside the entries directory.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
        && !id.chars().any(char::is_control)
}

/// An entry decoded from disk, remembering whether its title was filled in.
struct LoadedEntry {
    entry: Entry,
    title_defaulted: bool,
}

impl LoadedEntry {
    /// The title as searched: a placeholder title is not something the user wrote.
    fn indexed_title(&self) -> &str {
        if self.title_defaulted {
            ""
        } else {
            &self.entry.meta.title
        }
    }
}

/// Reads and decodes one entry file, falling back to the file stem for the ID.
fn load_entry_file(path: &Path) -> Option<LoadedEntry> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Skipping unreadable entry {}: {e}", path.display());
            return None;
        }
    };

    let decoded = frontmatter::decode(&raw);
    if !decoded.is_pristine() {
        log::debug!(
            "Recovered {} with defaults for {:?}",
            path.display(),
            decoded.defaulted
        );
    }

    let title_defaulted = decoded.defaulted.contains(&"title");
    let mut entry = decoded.entry;
    if entry.meta.id.is_empty() {
        entry.meta.id = path.file_stem()?.to_str()?.to_string();
    }
    Some(LoadedEntry {
        entry,
        title_defaulted,
    })
}
