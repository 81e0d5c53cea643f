//! Write-back seam for local edits.
//!
//! The data source is read-only. Edits made in memory are offered to a
//! [`CatalogWriter`], and callers must treat every save as fallible.

use super::types::AppRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    /// The configured data source cannot be written to.
    #[error("Catalog source is read-only; changes are kept in memory until the next refresh")]
    ReadOnly,
    #[error("Failed to save catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists a catalog after a local edit.
pub trait CatalogWriter: Send {
    fn save(&self, apps: &[AppRecord]) -> Result<(), WriteError>;
}

/// Writer for static sources: logs a notice and reports `ReadOnly`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadOnlyWriter;

impl CatalogWriter for ReadOnlyWriter {
    fn save(&self, apps: &[AppRecord]) -> Result<(), WriteError> {
        tracing::info!(
            count = apps.len(),
            "Catalog changed locally; update the data source and redeploy for it to take effect"
        );
        Err(WriteError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_writer_never_claims_success() {
        let result = ReadOnlyWriter.save(&[]);
        assert!(matches!(result, Err(WriteError::ReadOnly)));
        assert!(result.unwrap_err().to_string().contains("read-only"));
    }
}
