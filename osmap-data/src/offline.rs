//! File-backed storage for the downloaded map-data document.

use camino::{Utf8Path, Utf8PathBuf};
use osmap_core::{MAP_DATA_FILE_NAME, OfflineStore, StoreError};

/// Stores the map-data document as a single file.
///
/// Replacement goes through a sibling `.partial` file and a rename, so a
/// reader sees either the previous document or the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapStore {
    path: Utf8PathBuf,
}

impl FileMapStore {
    /// Store `map_data.xml` inside `data_dir`.
    #[must_use]
    pub fn in_dir(data_dir: &Utf8Path) -> Self {
        Self::at(data_dir.join(MAP_DATA_FILE_NAME))
    }

    /// Store the document at exactly `path`.
    #[must_use]
    pub fn at(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OfflineStore for FileMapStore {
    fn location(&self) -> &Utf8Path {
        &self.path
    }

    fn has_document(&self) -> Result<bool, StoreError> {
        osmap_fs::file_is_file(&self.path).map_err(|source| StoreError::Inspect {
            path: self.path.clone(),
            source,
        })
    }

    fn replace(&self, body: &[u8]) -> Result<u64, StoreError> {
        let written = osmap_fs::replace_file(&self.path, body).map_err(|source| {
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        log::debug!("replaced {} with {written} bytes", self.path);
        Ok(written)
    }
}
