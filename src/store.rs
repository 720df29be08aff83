//! The artist library: artists, their songs, and the import action that turns
//! a watched audio file into a song entry.

mod artists;
mod model;

pub use artists::{ArtistStore, StoreError};
