use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("bookmarked folder no longer exists: {0}")]
    Missing(PathBuf),

    #[error("malformed bookmark: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Opaque, persistable credential for re-opening a folder after restart.
///
/// Callers treat the bytes as a black box; only [`AccessToken::resolve`] looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(Vec<u8>);

#[derive(Serialize, Deserialize)]
struct Bookmark {
    path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_id: Option<u64>,
}

/// Outcome of resolving a token back into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolder {
    pub path: PathBuf,
    /// The folder exists but is not the one originally bookmarked (replaced or recreated).
    pub stale: bool,
}

impl AccessToken {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Bookmark an existing directory.
    pub fn for_folder(folder: &Path) -> Result<Self, BookmarkError> {
        let meta = fs::metadata(folder)?;
        if !meta.is_dir() {
            return Err(BookmarkError::NotADirectory(folder.to_path_buf()));
        }
        let path = fs::canonicalize(folder)?;
        let bookmark = Bookmark {
            path,
            file_id: file_id(&meta),
        };
        Ok(Self(serde_json::to_vec(&bookmark)?))
    }

    pub fn resolve(&self) -> Result<ResolvedFolder, BookmarkError> {
        let bookmark: Bookmark = serde_json::from_slice(&self.0)?;
        let meta = match fs::metadata(&bookmark.path) {
            Ok(meta) if meta.is_dir() => meta,
            Ok(_) => return Err(BookmarkError::NotADirectory(bookmark.path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BookmarkError::Missing(bookmark.path));
            }
            Err(e) => return Err(e.into()),
        };

        let stale = match (bookmark.file_id, file_id(&meta)) {
            (Some(saved), Some(current)) => saved != current,
            _ => false,
        };

        Ok(ResolvedFolder {
            path: bookmark.path,
            stale,
        })
    }
}

#[cfg(unix)]
fn file_id(meta: &fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ino())
}

#[cfg(not(unix))]
fn file_id(_meta: &fs::Metadata) -> Option<u64> {
    None
}
