use std::path::{Path, PathBuf};

/// An audio file found directly inside a watched folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedFile {
    pub path: PathBuf,
    /// File name including extension, used for display and ordering.
    pub name: String,
}

impl TrackedFile {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            name,
        }
    }
}
