use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::access::{TomlPreferences, Unrestricted};
use crate::app::ImportView;
use crate::logging;
use crate::store::ArtistStore;
use crate::watch::{FolderWatchRegistry, RegistryOptions};

mod event_loop;
mod picker;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let data_dir = settings.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let _log_guard = logging::init(&settings.log, &data_dir)?;
    info!("Starting with data dir {}", data_dir.display());

    let prefs = TomlPreferences::open(data_dir.join(&settings.prefs.file));
    let mut registry = FolderWatchRegistry::open(
        RegistryOptions::from_settings(&settings, &data_dir),
        Box::new(prefs),
        Box::new(Unrestricted),
    );

    info!("Import folder is {}", registry.import_folder().display());

    for arg in env::args().skip(1) {
        match picker::pick_folder(&arg) {
            Ok(path) => registry.add_folder(&path, true),
            Err(e) => error!("Folder import error: {}", e),
        }
    }

    let library_path = data_dir.join(&settings.library.library_file);
    let mut store = match ArtistStore::load(&library_path, settings.library.import_bucket.clone()) {
        Ok(store) => store,
        Err(e) => {
            // Never overwrite a library we failed to read.
            warn!("{}; imports this session will not be saved", e);
            ArtistStore::in_memory(settings.library.import_bucket.clone())
        }
    };

    info!(
        "Library has {} song(s) across {} artist(s)",
        store.song_count(),
        store.artists().len()
    );

    let mut view = ImportView::new(registry.files(), registry.folders());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut registry,
            &mut store,
            &mut view,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Shutting down");
    run_result
}
