//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{ImportView, InputMode};
use crate::config::UiSettings;
use crate::watch::WatchedFolder;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter/a", "add to library"),
    ("o", "watch folder"),
    ("X", "forget folder"),
    ("f", "open in files"),
    ("r", "rescan"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn folder_line(folder: &WatchedFolder) -> String {
    let mut line = folder.path.display().to_string();
    if !folder.live {
        line.push_str("  (not watched live)");
    }
    line
}

fn folders_title(view: &ImportView) -> String {
    match view.static_folders().len() {
        0 => " folders ".to_string(),
        n => format!(" folders ({} not watched live) ", n),
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, view: &ImportView, ui_settings: &UiSettings) {
    let folder_rows = view.folders.len().clamp(1, 6) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(folder_rows + 2),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let folders: Vec<ListItem> = view
        .folders
        .iter()
        .map(|f| ListItem::new(folder_line(f)))
        .collect();
    let folders = List::new(folders).block(Block::bordered().title(folders_title(view)));
    frame.render_widget(folders, chunks[1]);

    // Keep the selection centered once the listing is taller than the area.
    let total = view.files.len();
    let list_height = chunks[2].height.saturating_sub(2) as usize;
    let (start, end, selected_pos) = if total <= list_height || list_height == 0 {
        (0, total, view.selected)
    } else {
        let half = list_height / 2;
        let mut start = view.selected.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, view.selected - start)
    };

    let items: Vec<ListItem> = if !view.has_files() {
        vec![ListItem::new("Drop audio files into any watched folder")]
    } else {
        view.files[start..end]
            .iter()
            .map(|f| ListItem::new(f.name.as_str()))
            .collect()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" import "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos));
    }
    frame.render_stateful_widget(list, chunks[2], &mut state);

    let (title, text) = match view.input_mode {
        InputMode::AddFolder => (" watch folder (enter/esc) ", format!("> {}", view.input)),
        InputMode::RemoveFolder => (" forget folder (enter/esc) ", format!("> {}", view.input)),
        InputMode::Normal => match &view.status {
            Some(status) => (" status ", format!("{}\n{}", status, controls_text())),
            None => (" controls ", controls_text()),
        },
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
