//! Undirected links between entries, persisted as one JSON document.

use crate::{Result, StrataError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// An undirected link between two entry IDs.
///
/// Equality and hashing ignore direction: `a -> b` equals `b -> a`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// `true` if this connection joins `a` and `b` in either direction.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn mentions(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite `id`, if `id` is one of the two.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(&self.to)
        } else if self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }

    fn ordered(&self) -> (&str, &str) {
        if self.from <= self.to {
            (&self.from, &self.to)
        } else {
            (&self.to, &self.from)
        }
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

/// On-disk shape of `connections.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConnectionsDocument {
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Handle to a vault's connection document.
///
/// Every operation re-reads the document, so edits made by `save` are
/// immediately visible to the next `load`.
#[derive(Debug, Clone)]
pub struct ConnectionGraph {
    path: PathBuf,
}

impl ConnectionGraph {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all connections; a missing or unreadable document yields none.
    ///
    /// Duplicate pairs in a hand-edited document are collapsed, keeping the first.
    pub fn load(&self) -> Vec<Connection> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        let doc: ConnectionsDocument = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        let mut out: Vec<Connection> = Vec::with_capacity(doc.connections.len());
        for conn in doc.connections {
            if !out.contains(&conn) {
                out.push(conn);
            }
        }
        out
    }

    /// Overwrites the document with `connections`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Io`] if the document cannot be written.
    pub fn save(&self, connections: &[Connection]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let doc = ConnectionsDocument {
            connections: connections.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }

    /// Adds `conn` unless its pair is already linked. Returns whether it was added.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidConnection`] for a self-link or an empty
    /// endpoint, or [`StrataError::Io`] if saving fails.
    pub fn add(&self, conn: Connection) -> Result<bool> {
        if conn.from.is_empty() || conn.to.is_empty() {
            return Err(StrataError::InvalidConnection(
                "A connection needs two notes".to_string(),
            ));
        }
        if conn.from == conn.to {
            return Err(StrataError::InvalidConnection(
                "A note cannot be connected to itself".to_string(),
            ));
        }

        let mut connections = self.load();
        if connections.contains(&conn) {
            return Ok(false);
        }
        connections.push(conn);
        self.save(&connections)?;
        Ok(true)
    }

    /// Removes the link between `from` and `to` in either direction.
    pub fn remove(&self, from: &str, to: &str) -> Result<bool> {
        let mut connections = self.load();
        let before = connections.len();
        connections.retain(|c| !c.links(from, to));
        if connections.len() == before {
            return Ok(false);
        }
        self.save(&connections)?;
        Ok(true)
    }

    /// Removes every connection mentioning `id`, returning how many went.
    pub fn remove_all_for(&self, id: &str) -> Result<usize> {
        let mut connections = self.load();
        let before = connections.len();
        connections.retain(|c| !c.mentions(id));
        let removed = before - connections.len();
        if removed > 0 {
            self.save(&connections)?;
        }
        Ok(removed)
    }

    /// IDs directly linked to `id`, in document order.
    pub fn neighbours(&self, id: &str) -> Vec<String> {
        self.load()
            .iter()
            .filter_map(|c| c.other(id))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn graph(dir: &TempDir) -> ConnectionGraph {
        ConnectionGraph::new(dir.path().join(".strata").join("connections.json"))
    }

    #[test]
    fn test_connection_equality_ignores_direction() {
        assert_eq!(Connection::new("a", "b"), Connection::new("b", "a"));
        assert_ne!(Connection::new("a", "b"), Connection::new("a", "c"));
    }

    #[test]
    fn test_load_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(graph(&dir).load().is_empty());
    }

    #[test]
    fn test_load_malformed_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        fs::create_dir_all(g.path().parent().unwrap()).unwrap();
        fs::write(g.path(), "{ not json").unwrap();
        assert!(g.load().is_empty());
    }

    #[test]
    fn test_add_is_idempotent_across_directions() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        assert!(g.add(Connection::new("a", "b")).unwrap());
        assert!(!g.add(Connection::new("b", "a")).unwrap());
        assert!(!g.add(Connection::new("a", "b")).unwrap());

        let all = g.load();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].from, "a");
        assert_eq!(all[0].to, "b");
    }

    #[test]
    fn test_add_rejects_self_link() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        let result = g.add(Connection::new("a", "a"));
        assert!(matches!(result, Err(StrataError::InvalidConnection(_))));
        let result = g.add(Connection::new("", "b"));
        assert!(matches!(result, Err(StrataError::InvalidConnection(_))));
        assert!(g.load().is_empty());
    }

    #[test]
    fn test_remove_either_direction() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        g.add(Connection::new("a", "b")).unwrap();
        g.add(Connection::new("a", "c")).unwrap();

        assert!(g.remove("b", "a").unwrap());
        assert!(!g.remove("b", "a").unwrap());
        assert_eq!(g.load(), vec![Connection::new("a", "c")]);
    }

    #[test]
    fn test_remove_all_for_and_neighbours() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        g.add(Connection::new("a", "b")).unwrap();
        g.add(Connection::new("c", "a")).unwrap();
        g.add(Connection::new("b", "c")).unwrap();

        assert_eq!(g.neighbours("a"), vec!["b", "c"]);
        assert_eq!(g.remove_all_for("a").unwrap(), 2);
        assert_eq!(g.remove_all_for("a").unwrap(), 0);
        assert_eq!(g.load(), vec![Connection::new("b", "c")]);
    }

    #[test]
    fn test_load_collapses_duplicate_pairs() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        fs::create_dir_all(g.path().parent().unwrap()).unwrap();
        fs::write(
            g.path(),
            r#"{"connections":[{"from":"a","to":"b"},{"from":"b","to":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(g.load().len(), 1);
    }

    #[test]
    fn test_document_shape() {
        let dir = TempDir::new().unwrap();
        let g = graph(&dir);
        g.add(Connection::new("x", "y")).unwrap();
        let raw = fs::read_to_string(g.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["connections"][0]["from"], "x");
        assert_eq!(value["connections"][0]["to"], "y");
    }
}
