//! Outcome of permanently deleting an entry.
//!
//! Deletion is idempotent, so a caller cannot tell from `Ok(())` alone whether
//! anything was on disk. [`DeleteResult`] reports what actually went away.
//!
//! Fields serialize in camelCase (`fileRemoved`, `connectionsRemoved`),
//! consistent with all other types that cross to the UI layer.
//!
//! ```rust
//! use strata_core::DeleteResult;
//!
//! let result = DeleteResult {
//!     file_removed: true,
//!     connections_removed: 2,
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("fileRemoved"));
//! assert!(json.contains("connectionsRemoved"));
//! assert!(!result.was_noop());
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Whether an entry file existed and was removed.
    pub file_removed: bool,

    /// How many connections mentioning the entry were dropped.
    pub connections_removed: usize,
}

impl DeleteResult {
    /// `true` when there was nothing to delete.
    pub fn was_noop(&self) -> bool {
        !self.file_removed && self.connections_removed == 0
    }
}
