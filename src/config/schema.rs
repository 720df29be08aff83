use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the import folder, library file, preferences and logs live.
    /// Falls back to the XDG data directory when unset.
    pub data_dir: Option<PathBuf>,
    pub library: LibrarySettings,
    pub watch: WatchSettings,
    pub prefs: PrefsSettings,
    pub log: LogSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Name of the app-owned folder (inside the data dir) that is always watched.
    pub import_folder_name: String,
    /// Whether to follow symlinks when listing watched folders.
    pub follow_links: bool,
    /// File name of the JSON artist library inside the data dir.
    pub library_file: String,
    /// Artist that receives every imported song.
    pub import_bucket: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            import_folder_name: "Import".to_string(),
            follow_links: true,
            library_file: "library.json".to_string(),
            import_bucket: "External Imports".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Create OS change watches on folders. When off, listings only refresh on
    /// explicit rescans.
    pub enabled: bool,
    /// Fold every change signal queued at drain time into a single rescan.
    pub coalesce_events: bool,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            coalesce_events: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrefsSettings {
    /// File name of the preference store inside the data dir.
    pub file: String,
    /// Key holding the ordered list of folder bookmarks.
    pub bookmarks_key: String,
}

impl Default for PrefsSettings {
    fn default() -> Self {
        Self {
            file: "prefs.toml".to_string(),
            bookmarks_key: "ImportFolderBookmarks".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Prefix of the daily-rolled log files under `<data_dir>/logs`.
    pub file_name: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_name: "encore.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Drop audio files into any watched folder ~ ".to_string(),
        }
    }
}
