use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::model::{Artist, Song};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed library file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Default, Serialize, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    artists: Vec<Artist>,
}

/// Artists and songs, kept in memory and saved as one JSON file.
pub struct ArtistStore {
    path: Option<PathBuf>,
    bucket: String,
    artists: Vec<Artist>,
}

impl ArtistStore {
    /// A store with no backing file. `save` is a no-op.
    pub fn in_memory(bucket: impl Into<String>) -> Self {
        Self {
            path: None,
            bucket: bucket.into(),
            artists: Vec::new(),
        }
    }

    /// Load the library at `path`. A missing file is an empty library.
    pub fn load(path: impl Into<PathBuf>, bucket: impl Into<String>) -> Result<Self, StoreError> {
        let path = path.into();
        let artists = match fs::read(&path) {
            Ok(bytes) => {
                let file: LibraryFile =
                    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                        path: path.clone(),
                        source,
                    })?;
                file.artists
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No library at {}, starting empty", path.display());
                Vec::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path: Some(path),
            bucket: bucket.into(),
            artists,
        })
    }

    /// Write the library back to its file (temp file, then rename).
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let file = LibraryFile {
            artists: self.artists.clone(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    /// Add `file` as a new song of the catch-all import artist, creating that
    /// artist on first use.
    pub fn import_song(&mut self, file: &Path) -> &Song {
        let title = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let song = Song {
            title,
            version: String::new(),
            creators: Vec::new(),
            date: Utc::now(),
            notes: String::new(),
            artwork: None,
            file_name,
        };

        let idx = match self.artists.iter().position(|a| a.name == self.bucket) {
            Some(idx) => idx,
            None => {
                info!("Creating import artist {:?}", self.bucket);
                self.artists.push(Artist::new(self.bucket.clone()));
                self.artists.len() - 1
            }
        };

        let songs = &mut self.artists[idx].songs;
        songs.push(song);
        info!("Imported {}", file.display());
        &songs[songs.len() - 1]
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn artist(&self, name: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.name == name)
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    pub fn song_count(&self) -> usize {
        self.artists.iter().map(|a| a.songs.len()).sum()
    }
}
