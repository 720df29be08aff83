//! Application model types: `ImportView` and `InputMode`.
//!
//! The `ImportView` holds the latest published file and folder listings, the
//! selected file and the state of the folder path prompt.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::library::TrackedFile;
use crate::watch::WatchedFolder;

/// What the folder path prompt is collecting input for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AddFolder,
    RemoveFolder,
}

/// The import screen model.
pub struct ImportView {
    pub files: Arc<Vec<TrackedFile>>,
    pub folders: Arc<Vec<WatchedFolder>>,
    pub selected: usize,
    pub input_mode: InputMode,
    pub input: String,
    pub status: Option<String>,
}

impl ImportView {
    pub fn new(files: Arc<Vec<TrackedFile>>, folders: Arc<Vec<WatchedFolder>>) -> Self {
        Self {
            files,
            folders,
            selected: 0,
            input_mode: InputMode::Normal,
            input: String::new(),
            status: None,
        }
    }

    /// Take a new file listing, keeping the cursor on the same file when it
    /// is still listed.
    pub fn set_files(&mut self, files: Arc<Vec<TrackedFile>>) {
        if Arc::ptr_eq(&self.files, &files) {
            return;
        }
        let current = self.selected_file().map(|f| f.path.clone());
        self.files = files;
        self.selected = current
            .and_then(|p| self.files.iter().position(|f| f.path == p))
            .unwrap_or(self.selected);
        self.clamp_selection();
    }

    pub fn set_folders(&mut self, folders: Arc<Vec<WatchedFolder>>) {
        self.folders = folders;
    }

    pub fn selected_file(&self) -> Option<&TrackedFile> {
        self.files.get(self.selected)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Move down, wrapping to the top.
    pub fn next(&mut self) {
        if self.files.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.files.len();
    }

    /// Move up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.files.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.files.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.files.len().saturating_sub(1);
    }

    /// Open the folder path prompt.
    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    /// Close the prompt, returning what was typed (if it was open).
    pub fn finish_input(&mut self) -> Option<(InputMode, String)> {
        if self.input_mode == InputMode::Normal {
            return None;
        }
        let mode = std::mem::take(&mut self.input_mode);
        Some((mode, std::mem::take(&mut self.input)))
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// The first watched folder, which is the import folder once the registry is open.
    pub fn first_folder(&self) -> Option<&Path> {
        self.folders.first().map(|f| f.path.as_path())
    }

    /// Degraded folders, i.e. ones without a live change watch.
    pub fn static_folders(&self) -> Vec<PathBuf> {
        self.folders
            .iter()
            .filter(|f| !f.live)
            .map(|f| f.path.clone())
            .collect()
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.files.len() {
            self.selected = self.files.len().saturating_sub(1);
        }
    }
}
