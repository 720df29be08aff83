use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::{ImportView, InputMode};
use crate::config;
use crate::store::ArtistStore;
use crate::ui;
use crate::watch::FolderWatchRegistry;

use super::picker::pick_folder;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

const TICK: Duration = Duration::from_millis(50);

/// Main terminal event loop: applies published listings to the view, draws,
/// and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    registry: &mut FolderWatchRegistry,
    store: &mut ArtistStore,
    view: &mut ImportView,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let files_rx = registry.subscribe_files();
    let folders_rx = registry.subscribe_folders();

    loop {
        // Only the newest snapshot matters.
        if let Some(files) = files_rx.try_iter().last() {
            view.set_files(files);
        }
        if let Some(folders) = folders_rx.try_iter().last() {
            view.set_folders(folders);
        }

        terminal.draw(|f| ui::draw(f, view, &settings.ui))?;

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(key, registry, store, view, state)
                {
                    break;
                }
            }
            // Watch callbacks only queue signals; rescans happen here.
            registry.process_events();
        } else {
            registry.wait_for_events(TICK);
        }
    }

    Ok(())
}

fn handle_key_event(
    key: KeyEvent,
    registry: &mut FolderWatchRegistry,
    store: &mut ArtistStore,
    view: &mut ImportView,
    state: &mut EventLoopState,
) -> bool {
    if view.input_mode != InputMode::Normal {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => view.cancel_input(),
            KeyCode::Backspace => view.pop_input_char(),
            KeyCode::Enter => {
                if let Some((mode, input)) = view.finish_input() {
                    apply_folder_input(mode, &input, registry, view);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    view.push_input_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            view.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            view.prev();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                view.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            view.select_last();
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            state.pending_gg = false;
            import_selected(store, view);
        }
        KeyCode::Char('o') => {
            state.pending_gg = false;
            view.begin_input(InputMode::AddFolder);
        }
        KeyCode::Char('X') => {
            state.pending_gg = false;
            view.begin_input(InputMode::RemoveFolder);
        }
        KeyCode::Char('f') => {
            state.pending_gg = false;
            open_in_files(view);
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            registry.rescan();
            view.set_status(format!("Rescanned: {} file(s)", registry.files().len()));
        }
        _ => {
            state.pending_gg = false;
        }
    }

    false
}

fn import_selected(store: &mut ArtistStore, view: &mut ImportView) {
    let Some(file) = view.selected_file().cloned() else {
        return;
    };

    let title = store.import_song(&file.path).title.clone();
    let bucket = store.bucket_name();
    let count = store.artist(bucket).map_or(0, |a| a.songs.len());
    match store.save() {
        Ok(()) => view.set_status(format!(
            "Added \"{}\" to {} ({} song(s))",
            title, bucket, count
        )),
        Err(e) => {
            warn!("Failed to save library: {}", e);
            view.set_status(format!("Added \"{}\" (not saved)", title));
        }
    }
}

/// Show the first watched folder (the import folder) in the system file browser.
fn open_in_files(view: &mut ImportView) {
    let Some(folder) = view.first_folder().map(|p| p.to_path_buf()) else {
        return;
    };

    match opener::open(&folder) {
        Ok(()) => {
            info!("Opened {} in the file browser", folder.display());
            view.set_status(format!("Opened {}", folder.display()));
        }
        Err(e) => {
            warn!("Failed to open {}: {}", folder.display(), e);
            view.set_status(format!("Cannot open {}: {}", folder.display(), e));
        }
    }
}

fn apply_folder_input(
    mode: InputMode,
    input: &str,
    registry: &mut FolderWatchRegistry,
    view: &mut ImportView,
) {
    match mode {
        InputMode::AddFolder => match pick_folder(input) {
            Ok(path) => {
                registry.add_folder(&path, true);
                view.set_status(format!("Watching {}", path.display()));
            }
            Err(e) => {
                error!("Folder import error: {}", e);
                view.set_status(format!("Folder import error: {}", e));
            }
        },
        InputMode::RemoveFolder => {
            let path = std::path::PathBuf::from(input.trim());
            if registry.remove_folder(&path) {
                view.set_status(format!("Forgot {}", path.display()));
            } else {
                view.set_status(format!("Not a removable folder: {}", path.display()));
            }
        }
        InputMode::Normal => {}
    }
}
