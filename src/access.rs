//! Long-lived folder access: persistable bookmarks, the preference store that
//! keeps them across restarts, and the access scope held while a folder is in
//! use.

mod prefs;
mod scope;
mod token;

pub use prefs::*;
pub use scope::*;
pub use token::*;
