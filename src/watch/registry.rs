use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::access::{AccessScope, AccessToken, PreferenceStore};
use crate::config::Settings;
use crate::library::{self, TrackedFile};

use super::published::Published;
use super::watcher::{FolderChanged, FolderWatch};

/// How a registry is set up; normally derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// App-owned folder that is always watched and never bookmarked.
    pub import_folder: PathBuf,
    /// Preference key holding the bookmark list.
    pub bookmarks_key: String,
    pub watch_enabled: bool,
    pub coalesce_events: bool,
    pub follow_links: bool,
}

impl RegistryOptions {
    pub fn from_settings(settings: &Settings, data_dir: &Path) -> Self {
        Self {
            import_folder: data_dir.join(&settings.library.import_folder_name),
            bookmarks_key: settings.prefs.bookmarks_key.clone(),
            watch_enabled: settings.watch.enabled,
            coalesce_events: settings.watch.coalesce_events,
            follow_links: settings.library.follow_links,
        }
    }
}

/// A watched folder as shown to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFolder {
    pub path: PathBuf,
    /// An OS change watch is active. `false` means the listing for this folder
    /// only refreshes when something else triggers a rescan.
    pub live: bool,
    /// A bookmark for this folder is in the preference store.
    pub persisted: bool,
}

struct FolderEntry {
    path: PathBuf,
    watch: Option<FolderWatch>,
    access_held: bool,
    token: Option<AccessToken>,
}

pub struct FolderWatchRegistry {
    entries: Vec<FolderEntry>,
    files: Published<Vec<TrackedFile>>,
    folders: Published<Vec<WatchedFolder>>,
    prefs: Box<dyn PreferenceStore>,
    access: Box<dyn AccessScope>,
    events_tx: Sender<FolderChanged>,
    events_rx: Receiver<FolderChanged>,
    options: RegistryOptions,
}

impl FolderWatchRegistry {
    /// Build the registry: the import folder first, then every bookmarked
    /// folder that still resolves, then one rescan.
    pub fn open(
        options: RegistryOptions,
        prefs: Box<dyn PreferenceStore>,
        access: Box<dyn AccessScope>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let mut registry = Self {
            entries: Vec::new(),
            files: Published::new(Vec::new()),
            folders: Published::new(Vec::new()),
            prefs,
            access,
            events_tx,
            events_rx,
            options,
        };

        let import_folder = registry.options.import_folder.clone();
        if let Err(e) = fs::create_dir_all(&import_folder) {
            warn!(
                "Failed to create import folder {}: {}",
                import_folder.display(),
                e
            );
        }
        registry.insert(&import_folder, None, false);

        let tokens = registry.prefs.get(&registry.options.bookmarks_key);
        debug!("Restoring {} bookmarked folder(s)", tokens.len());
        for token in tokens {
            match token.resolve() {
                Ok(resolved) => {
                    if resolved.stale {
                        info!(
                            "Bookmark for {} is stale, using it anyway",
                            resolved.path.display()
                        );
                    }
                    registry.insert(&resolved.path, Some(token), true);
                }
                Err(e) => {
                    debug!("Dropping bookmark that no longer resolves: {}", e);
                }
            }
        }

        registry.publish_folders();
        registry.rescan();
        registry
    }

    /// Start watching `folder`. Already-watched folders are left untouched.
    pub fn add_folder(&mut self, folder: &Path, persist: bool) {
        let path = normalize(folder);
        if self.contains(&path) {
            debug!("Already watching {}", path.display());
            return;
        }

        self.insert(&path, None, true);
        self.publish_folders();
        self.rescan();

        if persist {
            self.persist(&path);
        }
    }

    /// Stop watching `folder` and forget its bookmark. The import folder
    /// cannot be removed. Returns whether a folder was removed.
    pub fn remove_folder(&mut self, folder: &Path) -> bool {
        let path = normalize(folder);
        if path == normalize(&self.options.import_folder) {
            info!("Refusing to remove the import folder {}", path.display());
            return false;
        }
        let Some(idx) = self.entries.iter().position(|e| e.path == path) else {
            return false;
        };

        let entry = self.entries.remove(idx);
        self.forget_bookmarks(&path, entry.token.as_ref());
        self.release(entry);

        info!("Stopped watching {}", path.display());
        self.publish_folders();
        self.rescan();
        true
    }

    /// Relist every watched folder and republish the file listing.
    pub fn rescan(&mut self) {
        let folders: Vec<PathBuf> = self.entries.iter().map(|e| e.path.clone()).collect();
        let files = library::collect(&folders, self.options.follow_links);
        debug!(
            "Rescanned {} folder(s): {} audio file(s)",
            folders.len(),
            files.len()
        );
        self.files.publish(files);
    }

    /// Handle every queued change signal without blocking. Returns how many
    /// signals were handled.
    pub fn process_events(&mut self) -> usize {
        self.drain(None)
    }

    /// Block up to `timeout` for the first change signal, then handle
    /// everything queued.
    pub fn wait_for_events(&mut self, timeout: Duration) -> usize {
        match self.events_rx.recv_timeout(timeout) {
            Ok(change) => self.drain(Some(change)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Sender for the change channel, for synthetic signals from outside the
    /// OS watchers.
    #[cfg(test)]
    pub fn event_sender(&self) -> Sender<FolderChanged> {
        self.events_tx.clone()
    }

    pub fn files(&self) -> Arc<Vec<TrackedFile>> {
        self.files.get()
    }

    pub fn folders(&self) -> Arc<Vec<WatchedFolder>> {
        self.folders.get()
    }

    pub fn subscribe_files(&mut self) -> Receiver<Arc<Vec<TrackedFile>>> {
        self.files.subscribe()
    }

    pub fn subscribe_folders(&mut self) -> Receiver<Arc<Vec<WatchedFolder>>> {
        self.folders.subscribe()
    }

    pub fn import_folder(&self) -> &Path {
        &self.options.import_folder
    }

    fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    fn drain(&mut self, first: Option<FolderChanged>) -> usize {
        let mut handled = 0;
        let mut next = first.or_else(|| self.events_rx.try_recv().ok());
        while let Some(change) = next {
            if self.is_watched(&change.folder) {
                // Any change anywhere refreshes every folder.
                if !self.options.coalesce_events {
                    self.rescan();
                }
                handled += 1;
            } else {
                debug!(
                    "Ignoring change for unwatched folder {}",
                    change.folder.display()
                );
            }
            next = self.events_rx.try_recv().ok();
        }
        if handled > 0 && self.options.coalesce_events {
            self.rescan();
        }
        handled
    }

    fn is_watched(&self, folder: &Path) -> bool {
        self.contains(folder) || self.contains(&normalize(folder))
    }

    fn insert(&mut self, folder: &Path, token: Option<AccessToken>, needs_access: bool) {
        let path = normalize(folder);
        if self.contains(&path) {
            return;
        }

        let access_held = needs_access && self.access.acquire(&path);

        let watch = if self.options.watch_enabled {
            match FolderWatch::start(&path, self.events_tx.clone()) {
                Ok(watch) => Some(watch),
                Err(e) => {
                    warn!(
                        "Cannot watch {}, listing it without change notifications: {}",
                        path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        info!("Watching {}", path.display());
        self.entries.push(FolderEntry {
            path,
            watch,
            access_held,
            token,
        });
    }

    fn persist(&mut self, path: &Path) {
        let token = match AccessToken::for_folder(path) {
            Ok(token) => token,
            Err(e) => {
                warn!("Cannot bookmark {}: {}", path.display(), e);
                return;
            }
        };

        let key = &self.options.bookmarks_key;
        let mut tokens = self.prefs.get(key);
        tokens.push(token.clone());
        if let Err(e) = self.prefs.set(key, &tokens) {
            warn!("Failed to save bookmark for {}: {}", path.display(), e);
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.token = Some(token);
        }
        self.publish_folders();
    }

    /// Drop every bookmark that leads to `path`, including stale ones for the
    /// same location. Bookmarks that no longer resolve are left alone.
    fn forget_bookmarks(&mut self, path: &Path, held: Option<&AccessToken>) {
        let key = &self.options.bookmarks_key;
        let mut tokens = self.prefs.get(key);
        let before = tokens.len();
        tokens.retain(|token| {
            if Some(token) == held {
                return false;
            }
            match token.resolve() {
                Ok(resolved) => normalize(&resolved.path) != path,
                Err(_) => true,
            }
        });
        if tokens.len() == before {
            return;
        }

        debug!(
            "Forgetting {} bookmark(s) for {}",
            before - tokens.len(),
            path.display()
        );
        if let Err(e) = self.prefs.set(key, &tokens) {
            warn!("Failed to forget bookmark for {}: {}", path.display(), e);
        }
    }

    fn publish_folders(&mut self) {
        let folders = self
            .entries
            .iter()
            .map(|e| WatchedFolder {
                path: e.path.clone(),
                live: e.watch.is_some(),
                persisted: e.token.is_some(),
            })
            .collect();
        self.folders.publish(folders);
    }

    fn release(&mut self, mut entry: FolderEntry) {
        drop(entry.watch.take());
        if entry.access_held {
            self.access.release(&entry.path);
        }
    }
}

impl Drop for FolderWatchRegistry {
    fn drop(&mut self) {
        for entry in std::mem::take(&mut self.entries) {
            self.release(entry);
        }
        debug!("Folder watch registry shut down");
    }
}

/// Canonical form when the folder exists, so one directory reached through
/// different paths is one entry.
fn normalize(folder: &Path) -> PathBuf {
    fs::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf())
}
