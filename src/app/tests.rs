use super::*;
use crate::library::TrackedFile;
use crate::watch::WatchedFolder;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn files(names: &[&str]) -> Arc<Vec<TrackedFile>> {
    Arc::new(
        names
            .iter()
            .map(|n| TrackedFile::new(&Path::new("/music").join(n)))
            .collect(),
    )
}

fn view(names: &[&str]) -> ImportView {
    ImportView::new(files(names), Arc::new(Vec::new()))
}

#[test]
fn next_and_prev_wrap_around() {
    let mut v = view(&["a.mp3", "b.mp3", "c.mp3"]);
    v.prev();
    assert_eq!(v.selected, 2);
    v.next();
    assert_eq!(v.selected, 0);
    v.next();
    assert_eq!(v.selected_file().unwrap().name, "b.mp3");
}

#[test]
fn movement_on_empty_listing_is_harmless() {
    let mut v = view(&[]);
    v.next();
    v.prev();
    v.select_last();
    assert_eq!(v.selected, 0);
    assert!(v.selected_file().is_none());
    assert!(!v.has_files());
}

#[test]
fn refresh_keeps_cursor_on_the_same_file() {
    let mut v = view(&["b.mp3", "c.mp3"]);
    v.next();
    assert_eq!(v.selected_file().unwrap().name, "c.mp3");

    v.set_files(files(&["a.mp3", "b.mp3", "c.mp3"]));

    assert_eq!(v.selected, 2);
    assert_eq!(v.selected_file().unwrap().name, "c.mp3");
}

#[test]
fn refresh_clamps_when_listing_shrinks() {
    let mut v = view(&["a.mp3", "b.mp3", "c.mp3"]);
    v.select_last();

    v.set_files(files(&["a.mp3"]));

    assert_eq!(v.selected, 0);
    assert_eq!(v.selected_file().unwrap().name, "a.mp3");
}

#[test]
fn prompt_collects_and_returns_typed_path() {
    let mut v = view(&[]);
    assert!(v.finish_input().is_none());

    v.begin_input(InputMode::AddFolder);
    for c in "/tmp/xy".chars() {
        v.push_input_char(c);
    }
    v.pop_input_char();

    assert_eq!(
        v.finish_input(),
        Some((InputMode::AddFolder, "/tmp/x".to_string()))
    );
    assert_eq!(v.input_mode, InputMode::Normal);
    assert!(v.input.is_empty());
}

#[test]
fn cancel_discards_prompt() {
    let mut v = view(&[]);
    v.begin_input(InputMode::RemoveFolder);
    v.push_input_char('x');
    v.cancel_input();

    assert_eq!(v.input_mode, InputMode::Normal);
    assert!(v.finish_input().is_none());
}

#[test]
fn static_folders_lists_only_degraded_ones() {
    let mut v = view(&[]);
    v.set_folders(Arc::new(vec![
        WatchedFolder {
            path: PathBuf::from("/music/Import"),
            live: true,
            persisted: false,
        },
        WatchedFolder {
            path: PathBuf::from("/mnt/nas"),
            live: false,
            persisted: true,
        },
    ]));

    assert_eq!(v.static_folders(), vec![PathBuf::from("/mnt/nas")]);
}

#[test]
fn first_folder_is_the_head_of_the_folder_list() {
    let mut v = view(&[]);
    assert!(v.first_folder().is_none());

    v.set_folders(Arc::new(vec![
        WatchedFolder {
            path: PathBuf::from("/data/Import"),
            live: true,
            persisted: false,
        },
        WatchedFolder {
            path: PathBuf::from("/mnt/nas"),
            live: true,
            persisted: true,
        },
    ]));
    assert_eq!(v.first_folder(), Some(Path::new("/data/Import")));
}
