//! The folder watch registry: which folders are watched, their OS change
//! watches, and the aggregated audio file listing kept in step with disk.
//!
//! All registry state lives on one owning thread. Watch callbacks only push a
//! `FolderChanged` signal into a channel; the owner drains it with
//! [`FolderWatchRegistry::process_events`].

mod published;
mod registry;
mod watcher;

pub use registry::{FolderWatchRegistry, RegistryOptions, WatchedFolder};
