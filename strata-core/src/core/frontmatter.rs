//! Conversion between an [`Entry`] and its on-disk text form.
//!
//! An entry file is a YAML metadata block fenced by `---` lines, followed by
//! the body verbatim:
//!
//! ```text
//! ---
//! id: 6f1c...
//! title: Pressure levels
//! structure: system
//! ...
//! ---
//! Body text, exactly as written.
//! ```
//!
//! Decoding never fails. Missing or mistyped fields fall back to their
//! defaults and are named in [`Decoded::defaulted`], so callers can tell a
//! recovered entry from a pristine one without scraping logs.
//!
//! ```rust
//! use strata_core::core::frontmatter::{decode, encode};
//! use strata_core::Entry;
//!
//! let mut entry = Entry::new("n1");
//! entry.meta.title = "Hello".to_string();
//! entry.body = "# Heading\n".to_string();
//!
//! let text = encode(&entry).unwrap();
//! let decoded = decode(&text);
//! assert!(decoded.is_pristine());
//! assert_eq!(decoded.entry, entry);
//! ```

use crate::core::entry::{Entry, EntryMeta, Pressure, Structure, DEFAULT_TITLE};
use crate::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::str::FromStr;

/// Line that opens and closes the metadata block.
pub const DELIMITER: &str = "---";

/// Every metadata key that is expected to be present.
///
/// `sortOrder` is not listed: its absence is meaningful, not a defect.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "id", "title", "structure", "pressure", "pinned", "archived", "trashed", "notebook", "tags",
    "created", "modified",
];

/// The best-effort result of decoding an entry file.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub entry: Entry,
    /// Metadata keys that were missing or invalid and replaced by defaults.
    pub defaulted: Vec<&'static str>,
}

impl Decoded {
    /// `true` when every field came from the file as written.
    pub fn is_pristine(&self) -> bool {
        self.defaulted.is_empty()
    }
}

#[derive(Serialize)]
struct Frontmatter<'a> {
    id: &'a str,
    title: &'a str,
    structure: Structure,
    pressure: Pressure,
    pinned: bool,
    archived: bool,
    trashed: bool,
    notebook: &'a str,
    tags: &'a [String],
    created: String,
    modified: String,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    sort_order: Option<f64>,
}

/// Renders `entry` as a metadata block followed by its body.
///
/// Keys are always written in the same order, so unchanged entries produce
/// byte-identical files.
///
/// # Errors
///
/// Returns [`crate::StrataError::Yaml`] if the metadata cannot be serialised.
pub fn encode(entry: &Entry) -> Result<String> {
    let meta = &entry.meta;
    let fm = Frontmatter {
        id: &meta.id,
        title: &meta.title,
        structure: meta.structure,
        pressure: meta.pressure,
        pinned: meta.pinned,
        archived: meta.archived,
        trashed: meta.trashed,
        notebook: &meta.notebook,
        tags: &meta.tags,
        created: format_timestamp(&meta.created),
        modified: format_timestamp(&meta.modified),
        sort_order: meta.sort_order,
    };
    let yaml = serde_yaml::to_string(&fm)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", entry.body))
}

/// Parses entry text, substituting defaults for anything unusable.
///
/// A missing `id` decodes to the empty string; the store fills it in from the
/// file name.
pub fn decode(text: &str) -> Decoded {
    let Some((yaml, body)) = split(text) else {
        return all_defaults(text);
    };

    let mapping = match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => map,
        Ok(Value::Null) => Mapping::new(),
        _ => return all_defaults(body),
    };

    let now = Utc::now();
    let mut fields = FieldReader {
        map: &mapping,
        defaulted: Vec::new(),
    };
    let meta = EntryMeta {
        id: fields.text("id", ""),
        title: fields.text("title", DEFAULT_TITLE),
        structure: fields.keyword("structure"),
        pressure: fields.keyword("pressure"),
        pinned: fields.flag("pinned"),
        archived: fields.flag("archived"),
        trashed: fields.flag("trashed"),
        notebook: fields.text("notebook", ""),
        tags: fields.tags(),
        created: fields.timestamp("created", now),
        modified: fields.timestamp("modified", now),
        sort_order: fields.sort_order(),
    };

    Decoded {
        entry: Entry {
            meta,
            body: body.to_string(),
        },
        defaulted: fields.defaulted,
    }
}

/// Splits text into `(yaml, body)`, or `None` if there is no closed block.
fn split(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    // Empty block: the closing delimiter immediately follows the opening one.
    if let Some(body) = rest
        .strip_prefix("---\n")
        .or_else(|| rest.strip_prefix("---\r\n"))
    {
        return Some(("", body));
    }
    if rest == DELIMITER {
        return Some(("", ""));
    }

    let close = ["\n---\n", "\n---\r\n"]
        .iter()
        .filter_map(|d| rest.find(d).map(|idx| (idx, d.len())))
        .min_by_key(|(idx, _)| *idx);

    match close {
        Some((idx, len)) => Some((&rest[..idx], &rest[idx + len..])),
        None => rest
            .strip_suffix("\n---")
            .or_else(|| rest.strip_suffix("\n---\r"))
            .map(|yaml| (yaml, "")),
    }
}

fn all_defaults(body: &str) -> Decoded {
    let mut entry = Entry::new("");
    entry.meta.title = DEFAULT_TITLE.to_string();
    entry.body = body.to_string();
    Decoded {
        entry,
        defaulted: REQUIRED_FIELDS.to_vec(),
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Hand-written files sometimes carry a bare date.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Pulls typed fields out of a YAML mapping, recording every fallback.
struct FieldReader<'a> {
    map: &'a Mapping,
    defaulted: Vec<&'static str>,
}

impl FieldReader<'_> {
    fn fallback<T>(&mut self, key: &'static str, value: T) -> T {
        self.defaulted.push(key);
        value
    }

    fn text(&mut self, key: &'static str, default: &str) -> String {
        match self.map.get(key).and_then(scalar_text) {
            Some(s) => s,
            None => self.fallback(key, default.to_string()),
        }
    }

    fn flag(&mut self, key: &'static str) -> bool {
        match self.map.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => self.fallback(key, false),
        }
    }

    fn keyword<T: FromStr + Default>(&mut self, key: &'static str) -> T {
        match self
            .map
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<T>().ok())
        {
            Some(v) => v,
            None => self.fallback(key, T::default()),
        }
    }

    fn tags(&mut self) -> Vec<String> {
        let Some(Value::Sequence(items)) = self.map.get("tags") else {
            return self.fallback("tags", Vec::new());
        };
        let tags: Vec<String> = items.iter().filter_map(scalar_text).collect();
        if tags.len() != items.len() {
            self.defaulted.push("tags");
        }
        tags
    }

    fn timestamp(&mut self, key: &'static str, now: DateTime<Utc>) -> DateTime<Utc> {
        match self
            .map
            .get(key)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
        {
            Some(ts) => ts,
            None => self.fallback(key, now),
        }
    }

    fn sort_order(&mut self) -> Option<f64> {
        match self.map.get("sortOrder") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_f64().filter(|n| n.is_finite()) {
                Some(n) => Some(n),
                None => self.fallback("sortOrder", None),
            },
        }
    }
}
