//! The entry data model shared by every vault component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title substituted when a stored entry carries none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// What kind of thinking an entry represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    #[default]
    Thought,
    Idea,
    Question,
    Decision,
    System,
    Insight,
}

impl Structure {
    pub const ALL: [Structure; 6] = [
        Structure::Thought,
        Structure::Idea,
        Structure::Question,
        Structure::Decision,
        Structure::System,
        Structure::Insight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thought => "thought",
            Self::Idea => "idea",
            Self::Question => "question",
            Self::Decision => "decision",
            Self::System => "system",
            Self::Insight => "insight",
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Structure {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// How urgently an entry demands attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pressure {
    #[default]
    Low,
    Medium,
    High,
}

impl Pressure {
    pub const ALL: [Pressure; 3] = [Pressure::Low, Pressure::Medium, Pressure::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pressure {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Every field of an entry except its body.
///
/// This is what listings return; the body is only loaded by a full read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    pub id: String,
    pub title: String,
    pub structure: Structure,
    pub pressure: Pressure,
    pub pinned: bool,
    pub archived: bool,
    pub trashed: bool,
    /// Encoded `notebook/section` path; see [`NotebookPath`](super::notebook::NotebookPath).
    pub notebook: String,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<f64>,
}

/// One note: its metadata plus the free-form body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub body: String,
}

impl EntryMeta {
    /// Creates metadata for a brand-new entry with `created = modified = now`.
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: String::new(),
            structure: Structure::default(),
            pressure: Pressure::default(),
            pinned: false,
            archived: false,
            trashed: false,
            notebook: String::new(),
            tags: Vec::new(),
            created: now,
            modified: now,
            sort_order: None,
        }
    }
}

impl Entry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            meta: EntryMeta::new(id),
            body: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }
}

/// Lower-cases and trims tags, dropping empties and later duplicates.
///
/// Unlike a sorted set this keeps first-seen order so a file round-trips.
pub fn normalise_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
