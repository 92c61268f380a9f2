//! Recursive discovery of sound scripts under a root directory

use crate::error::{Error, Result};
use crate::script::{is_script_path, Script};
use std::path::Path;
use walkdir::WalkDir;

/// Lazily walk `root`, loading every `.s` file in file-name order
///
/// Directories and files with other extensions are skipped.
pub fn scripts(root: &Path) -> Result<impl Iterator<Item = Result<Script>>> {
    if !root.exists() {
        return Err(Error::MissingPath(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root).sort_by_file_name().into_iter();

    Ok(walker.filter_map(|entry| match entry {
        Ok(entry) => {
            // Links are not followed, but a link to a script still counts
            if entry.path().is_dir() || !is_script_path(entry.path()) {
                return None;
            }
            Some(Script::load(entry.path()))
        }
        Err(e) => Some(Err(Error::Walk(e))),
    }))
}
