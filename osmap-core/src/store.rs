//! Local storage for the most recent map-data document.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// File name used for the persisted map-data document.
pub const MAP_DATA_FILE_NAME: &str = "map_data.xml";

/// Errors raised by [`OfflineStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Inspecting the stored document failed for a reason other than absence.
    #[error("failed to inspect {path}: {source}")]
    Inspect {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the document failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Holds a single downloaded document.
///
/// Existence of the document is the only signal that offline content is
/// available. Replacing it is all-or-nothing.
pub trait OfflineStore {
    /// Where the document lives.
    fn location(&self) -> &Utf8Path;

    /// Whether a document has been stored.
    fn has_document(&self) -> Result<bool, StoreError>;

    /// Overwrite the stored document with `body`, returning the bytes written.
    fn replace(&self, body: &[u8]) -> Result<u64, StoreError>;
}
