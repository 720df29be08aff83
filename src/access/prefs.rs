use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::token::AccessToken;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Process-wide key/value storage for ordered token lists.
pub trait PreferenceStore {
    /// Tokens stored under `key`, in insertion order. Missing keys read as empty.
    fn get(&self, key: &str) -> Vec<AccessToken>;
    /// Replace the list stored under `key`.
    fn set(&mut self, key: &str, tokens: &[AccessToken]) -> Result<(), PrefsError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    bookmarks: BTreeMap<String, Vec<String>>,
}

/// TOML-backed preference file; tokens are stored base64-encoded.
///
/// ```toml
/// [bookmarks]
/// ImportFolderBookmarks = ["eyJwYXRoIjoi..."]
/// ```
pub struct TomlPreferences {
    path: PathBuf,
    contents: PrefsFile,
}

impl TomlPreferences {
    /// Open the preference file at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences at {}: {}", path.display(), e);
                PrefsFile::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => PrefsFile::default(),
            Err(e) => {
                warn!("Failed to read preferences at {}: {}", path.display(), e);
                PrefsFile::default()
            }
        };
        Self { path, contents }
    }

    fn flush(&self) -> Result<(), PrefsError> {
        let text = toml::to_string_pretty(&self.contents)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PrefsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for TomlPreferences {
    fn get(&self, key: &str) -> Vec<AccessToken> {
        let Some(entries) = self.contents.bookmarks.get(key) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|encoded| match STANDARD.decode(encoded) {
                Ok(bytes) => Some(AccessToken::from_bytes(bytes)),
                Err(e) => {
                    warn!("Skipping undecodable bookmark under {key}: {e}");
                    None
                }
            })
            .collect()
    }

    fn set(&mut self, key: &str, tokens: &[AccessToken]) -> Result<(), PrefsError> {
        let encoded = tokens.iter().map(|t| STANDARD.encode(t.as_bytes())).collect();
        self.contents.bookmarks.insert(key.to_string(), encoded);
        self.flush()
    }
}

/// In-memory store. Clones share state, so handing a clone to a second
/// registry behaves like a process restart over the same preferences.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryPreferences {
    entries: Arc<Mutex<BTreeMap<String, Vec<AccessToken>>>>,
}

#[cfg(test)]
impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Vec<AccessToken> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned().unwrap_or_default()
    }

    fn set(&mut self, key: &str, tokens: &[AccessToken]) -> Result<(), PrefsError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), tokens.to_vec());
        Ok(())
    }
}
