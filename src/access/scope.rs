use std::path::Path;

/// Permission to touch a user-granted folder, held for as long as the folder
/// is watched.
pub trait AccessScope {
    /// Start accessing `folder`. Returns whether a grant is now held and must
    /// later be released.
    fn acquire(&mut self, folder: &Path) -> bool;
    fn release(&mut self, folder: &Path);
}

/// For platforms without a sandbox permission model: every folder is always
/// accessible and there is nothing to release.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unrestricted;

impl AccessScope for Unrestricted {
    fn acquire(&mut self, _folder: &Path) -> bool {
        true
    }

    fn release(&mut self, _folder: &Path) {}
}
