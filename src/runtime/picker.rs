use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickError {
    #[error("no folder given")]
    Empty,

    #[error("not a folder: {0}")]
    NotAFolder(PathBuf),
}

/// Turn typed input into a folder path: trimmed, `~` expanded, and required
/// to name an existing directory.
pub fn pick_folder(input: &str) -> Result<PathBuf, PickError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PickError::Empty);
    }

    let path = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest.trim_start_matches('/')),
            None => PathBuf::from(input),
        },
        _ => PathBuf::from(input),
    };

    if path.is_dir() {
        Ok(path)
    } else {
        Err(PickError::NotAFolder(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn existing_directory_is_accepted_after_trimming() {
        let dir = tempdir().unwrap();
        let typed = format!("  {}  ", dir.path().display());
        assert_eq!(pick_folder(&typed).unwrap(), dir.path());
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(pick_folder("   "), Err(PickError::Empty)));
    }

    #[test]
    fn files_and_missing_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            pick_folder(file.to_str().unwrap()),
            Err(PickError::NotAFolder(_))
        ));
        assert!(matches!(
            pick_folder(dir.path().join("missing").to_str().unwrap()),
            Err(PickError::NotAFolder(_))
        ));
    }

    #[test]
    fn tilde_user_form_is_left_alone() {
        assert!(matches!(
            pick_folder("~someone-else/music"),
            Err(PickError::NotAFolder(p)) if p == PathBuf::from("~someone-else/music")
        ));
    }
}
