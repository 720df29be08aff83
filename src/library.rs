//! Audio file discovery inside watched folders.
//!
//! Listing is shallow (immediate entries only) and type detection looks at
//! file contents rather than extensions.

mod model;
mod scan;

pub use model::TrackedFile;
pub use scan::collect;
