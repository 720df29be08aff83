//! Application module: exposes the import screen model used by the TUI and runtime.
//!
//! The `ImportView` model lives in `app::model` and holds the current listings,
//! selection and folder prompt state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
