use std::path::{Path, PathBuf};

use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// 蔵書全体 = 1 JSONファイル（Bookの配列）。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルが無ければ Ok(None)。読めない・壊れている場合は Err。
    fn read(&self) -> Result<Option<Library>, JsonStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let library: Library = serde_json::from_str(&content)?;
        Ok(Some(library))
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Library {
        match self.read() {
            Ok(Some(library)) => {
                tracing::info!(path = %self.path.display(), books = library.len(), "library loaded");
                library
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "no library file, starting empty");
                Library::new()
            }
            Err(e) => {
                // 壊れたファイルは空として扱う（上書きされるまでディスク上には残る）
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding unreadable library file, starting empty"
                );
                Library::new()
            }
        }
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(library)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "library saved");
        Ok(())
    }
}
