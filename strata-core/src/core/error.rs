//! Error types for the Strata core library.

use thiserror::Error;

/// All errors that can occur within the Strata core library.
///
/// Not-found and malformed-content conditions are deliberately absent: the
/// store reports those as `None` / defaulted values rather than errors.
#[derive(Debug, Error)]
pub enum StrataError {
    /// An I/O operation on the vault directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document (connections, settings) could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entry metadata could not be rendered as YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The entry ID cannot be used as a file name inside the vault.
    #[error("Invalid entry id: {0:?}")]
    InvalidEntryId(String),

    /// A connection was rejected before it reached the graph.
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// The vault root could not be prepared.
    #[error("Invalid vault: {0}")]
    InvalidVault(String),

    /// A section rename failed after `rewritten` entries were already moved.
    #[error("Section rename interrupted after {rewritten} entries: {source}")]
    CascadeInterrupted {
        rewritten: usize,
        #[source]
        source: Box<StrataError>,
    },
}

/// Convenience alias that pins the error type to [`StrataError`].
pub type Result<T> = std::result::Result<T, StrataError>;

impl StrataError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Failed to save: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Yaml(e) => format!("Data format error: {e}"),
            Self::InvalidEntryId(_) => "This note has an unusable identifier".to_string(),
            Self::InvalidConnection(msg) => msg.clone(),
            Self::InvalidVault(_) => "Could not open vault folder".to_string(),
            Self::CascadeInterrupted { rewritten, source } => format!(
                "Rename stopped after {rewritten} notes: {}",
                source.user_message()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_reads_as_save_failure() {
        let e = StrataError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(e.user_message().starts_with("Failed to save"));
    }

    #[test]
    fn test_cascade_interrupted_reports_count() {
        let e = StrataError::CascadeInterrupted {
            rewritten: 3,
            source: Box::new(StrataError::Io(std::io::Error::other("disk full"))),
        };
        assert!(e.to_string().contains("3 entries"));
        assert!(e.user_message().contains("3 notes"));
        assert!(e.user_message().contains("disk full"));
    }
}
