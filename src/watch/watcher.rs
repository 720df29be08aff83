use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, trace};

/// "Something in this folder was written." Carries no detail about what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderChanged {
    pub folder: PathBuf,
}

/// A live OS watch on one directory. Dropping it stops delivery and closes
/// the underlying descriptor.
pub struct FolderWatch {
    _watcher: RecommendedWatcher,
}

impl FolderWatch {
    /// Watch `folder` (non-recursively) and forward write-type events as
    /// [`FolderChanged`] signals on `tx`.
    pub fn start(folder: &Path, tx: Sender<FolderChanged>) -> notify::Result<Self> {
        let signal = FolderChanged {
            folder: folder.to_path_buf(),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_write(&event.kind) {
                        return;
                    }
                    trace!(?event, "Folder change");
                    if tx.send(signal.clone()).is_err() {
                        trace!("Registry gone, dropping change for {}", signal.folder.display());
                    }
                }
                Err(e) => {
                    error!("Watch error on {}: {:?}", signal.folder.display(), e);
                }
            },
            Config::default(),
        )?;

        watcher.watch(folder, RecursiveMode::NonRecursive)?;

        Ok(Self { _watcher: watcher })
    }
}

fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}
