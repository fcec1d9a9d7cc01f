//! Display order for entry lists and manual reorder positions.

use crate::EntryMeta;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Gap between consecutive manual positions assigned by [`reorder`].
pub const SORT_ORDER_STEP: f64 = 100.0;

/// A new manual position for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortUpdate {
    pub id: String,
    pub sort_order: f64,
}

/// Compares two entries for display.
///
/// Pinned entries come first. Within the same pin state, an explicit
/// `sort_order` wins, with a missing one treated as +infinity. Entries that
/// tie, or that both lack a position, fall back to most recently modified first.
pub fn display_order(a: &EntryMeta, b: &EntryMeta) -> Ordering {
    if a.pinned != b.pinned {
        return if a.pinned { Ordering::Less } else { Ordering::Greater };
    }
    if a.sort_order.is_some() || b.sort_order.is_some() {
        let a_pos = a.sort_order.unwrap_or(f64::INFINITY);
        let b_pos = b.sort_order.unwrap_or(f64::INFINITY);
        let by_position = a_pos.total_cmp(&b_pos);
        if by_position != Ordering::Equal {
            return by_position;
        }
    }
    b.modified.cmp(&a.modified)
}

/// Sorts `entries` in place with [`display_order`].
pub fn sort_for_display(entries: &mut [EntryMeta]) {
    entries.sort_by(display_order);
}

/// Assigns `(index + 1) * 100` to each ID in the order given.
pub fn reorder<S: AsRef<str>>(ids: &[S]) -> Vec<SortUpdate> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| SortUpdate {
            id: id.as_ref().to_string(),
            sort_order: (idx + 1) as f64 * SORT_ORDER_STEP,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn meta(id: &str, pinned: bool, sort_order: Option<f64>, minutes: i64) -> EntryMeta {
        let mut m = EntryMeta::new(id);
        m.pinned = pinned;
        m.sort_order = sort_order;
        m.modified = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        m
    }

    fn ids(entries: &[EntryMeta]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_pinned_then_sort_order() {
        let mut entries = vec![
            meta("1", false, Some(200.0), 1),
            meta("2", true, None, 0),
            meta("3", false, Some(100.0), 2),
        ];
        sort_for_display(&mut entries);
        assert_eq!(ids(&entries), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_unordered_entries_follow_ordered_ones() {
        let mut entries = vec![
            meta("fresh", false, None, 50),
            meta("placed", false, Some(300.0), 0),
        ];
        sort_for_display(&mut entries);
        assert_eq!(ids(&entries), vec!["placed", "fresh"]);
    }

    #[test]
    fn test_falls_back_to_modified_descending() {
        let mut entries = vec![
            meta("old", false, None, 1),
            meta("new", false, None, 9),
            meta("mid", false, None, 5),
        ];
        sort_for_display(&mut entries);
        assert_eq!(ids(&entries), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_equal_sort_order_uses_modified() {
        let a = meta("a", false, Some(100.0), 1);
        let b = meta("b", false, Some(100.0), 2);
        assert_eq!(display_order(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_reorder_assigns_hundreds() {
        let updates = reorder(&["1", "3"]);
        assert_eq!(
            updates,
            vec![
                SortUpdate { id: "1".to_string(), sort_order: 100.0 },
                SortUpdate { id: "3".to_string(), sort_order: 200.0 },
            ]
        );
        assert!(reorder::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_sort_update_wire_shape() {
        let json = serde_json::to_string(&SortUpdate { id: "x".to_string(), sort_order: 100.0 }).unwrap();
        assert_eq!(json, r#"{"id":"x","sortOrder":100.0}"#);
    }
}
