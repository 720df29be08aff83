//! Audio fixtures for tests: just enough leading bytes for container sniffing.

use std::fs;
use std::path::Path;

/// An MPEG-1 Layer III frame header followed by silence.
pub fn mp3_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFB, 0x90, 0x64];
    bytes.resize(128, 0);
    bytes
}

/// A RIFF/WAVE header followed by silence.
pub fn wav_bytes() -> Vec<u8> {
    let mut bytes = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();
    bytes.resize(128, 0);
    bytes
}

/// An ISO-BMFF `ftyp` box with the given brands, padded to 256 bytes.
pub fn ftyp_bytes(major: &[u8; 4], compatible: &[&[u8; 4]]) -> Vec<u8> {
    let size = 16 + 4 * compatible.len() as u32;
    let mut bytes = size.to_be_bytes().to_vec();
    bytes.extend_from_slice(b"ftyp");
    bytes.extend_from_slice(major);
    bytes.extend_from_slice(&[0, 0, 2, 0]);
    for brand in compatible {
        bytes.extend_from_slice(*brand);
    }
    bytes.resize(256, 0);
    bytes
}

pub fn m4a_bytes() -> Vec<u8> {
    ftyp_bytes(b"M4A ", &[b"M4A ", b"mp42", b"isom"])
}

pub fn heic_bytes() -> Vec<u8> {
    ftyp_bytes(b"heic", &[b"mif1", b"heic"])
}

pub fn mp4_video_bytes() -> Vec<u8> {
    ftyp_bytes(b"isom", &[b"isom", b"iso2", b"avc1", b"mp41"])
}

pub fn write_mp3(path: &Path) {
    fs::write(path, mp3_bytes()).unwrap();
}

pub fn write_wav(path: &Path) {
    fs::write(path, wav_bytes()).unwrap();
}
