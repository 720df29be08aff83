use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use lofty::file::FileType;
use lofty::probe::Probe;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::model::TrackedFile;

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// ISO-BMFF brands that mark an audio-only file.
const AUDIO_BRANDS: &[&[u8; 4]] = &[b"M4A ", b"M4B ", b"M4P ", b"F4A ", b"F4B "];

/// Upper bound on how much of an `ftyp` box is read for its brand list.
const MAX_FTYP_LEN: usize = 256;

/// Sniff the audio container from the file's leading bytes.
///
/// The probe starts without an extension hint, so `notes.mp3` full of text is
/// rejected and an extensionless WAV is accepted. ISO-BMFF files are only
/// audio when their `ftyp` box names an audio brand; HEIC photos and MP4
/// video share the container.
pub fn detect_audio_type(path: &Path) -> Option<FileType> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("Cannot open {} for type detection: {}", path.display(), e);
            return None;
        }
    };

    let file_type = match Probe::new(BufReader::new(file)).guess_file_type() {
        Ok(probe) => probe.file_type()?,
        Err(e) => {
            debug!("Type detection failed for {}: {}", path.display(), e);
            return None;
        }
    };

    if file_type == FileType::Mp4 && !has_audio_brand(path) {
        trace!("ISO-BMFF without an audio brand: {}", path.display());
        return None;
    }
    Some(file_type)
}

/// Whether the leading `ftyp` box lists an audio brand as major or compatible.
fn has_audio_brand(path: &Path) -> bool {
    let mut head = Vec::with_capacity(MAX_FTYP_LEN);
    let read = File::open(path).and_then(|f| f.take(MAX_FTYP_LEN as u64).read_to_end(&mut head));
    if let Err(e) = read {
        debug!("Cannot read ftyp box of {}: {}", path.display(), e);
        return false;
    }
    ftyp_brands(&head).any(|brand| AUDIO_BRANDS.iter().any(|audio| *audio == brand))
}

/// Major brand followed by the compatible brands of a leading `ftyp` box.
pub(super) fn ftyp_brands(head: &[u8]) -> impl Iterator<Item = &[u8; 4]> {
    let boxed: &[u8] = match head.get(..8) {
        Some(h) if &h[4..8] == b"ftyp" => {
            let size = u32::from_be_bytes([h[0], h[1], h[2], h[3]]) as usize;
            // Size 0 runs to end of file; anything past what was read is cut off.
            let end = if size == 0 { head.len() } else { size.min(head.len()) };
            head.get(8..end).unwrap_or(&[])
        }
        _ => &[],
    };

    // Layout: major brand, minor version, then compatible brands.
    let major = boxed.get(..4);
    let compatible = boxed.get(8..).unwrap_or(&[]).chunks_exact(4);
    major
        .into_iter()
        .chain(compatible)
        .filter_map(|b| <&[u8; 4]>::try_from(b).ok())
}

pub fn is_audio_file(path: &Path) -> bool {
    detect_audio_type(path).is_some()
}

/// Audio files directly inside `folder`, hidden entries excluded.
///
/// A folder that cannot be listed contributes nothing.
pub fn list_folder(folder: &Path, follow_links: bool) -> Vec<TrackedFile> {
    let mut files = Vec::new();

    let walker = WalkDir::new(folder)
        .follow_links(follow_links)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker.into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unlistable entry under {}: {}", folder.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }
        if is_audio_file(path) {
            files.push(TrackedFile::new(path));
        } else {
            trace!("Not audio: {}", path.display());
        }
    }

    files
}

/// Union of every folder's audio files, ordered by case-insensitive name.
pub fn collect(folders: &[PathBuf], follow_links: bool) -> Vec<TrackedFile> {
    let mut files: Vec<TrackedFile> = folders
        .iter()
        .flat_map(|folder| list_folder(folder, follow_links))
        .collect();

    files.sort_by_cached_key(|f| f.name.to_lowercase());
    files
}
