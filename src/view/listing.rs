//! Directory listing for the directory view.
//!
//! Entry order follows whatever `read_dir` yields. It is not sorted and
//! callers must not rely on alphabetical order.

use std::path::Path;

use super::classify::{is_hidden_name, is_markdown};
use crate::paths;

/// Name of the file a directory redirects to when present.
pub const INDEX_FILE: &str = "index.md";

/// Subdirectories and markdown documents of one directory, as root-relative URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// URL of `dir/index.md` if that file exists.
///
/// Runs before, and independently of, [`list`].
pub fn index_redirect(root: &Path, dir: &Path) -> Option<String> {
    let index = dir.join(INDEX_FILE);
    if !index.is_file() {
        return None;
    }
    paths::relative_url(root, &index)
}

/// List `dir`, skipping hidden entries and non-markdown files.
///
/// An unreadable directory yields an empty listing. Entries that fail to
/// stat (broken symlinks, concurrent deletion) are skipped.
pub fn list(root: &Path, dir: &Path) -> DirectoryListing {
    let mut listing = DirectoryListing::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            crate::debug_event!("listing", "unreadable", "{}: {e}", dir.display());
            return listing;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        if is_hidden_name(&name.to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        // Follows symlinks, so a link to a directory lists as a directory.
        let Ok(metadata) = std::fs::metadata(&path) else {
            continue;
        };
        let Some(url) = paths::relative_url(root, &path) else {
            continue;
        };

        if metadata.is_dir() {
            listing.dirs.push(url);
        } else if is_markdown(&path) {
            listing.files.push(url);
        }
    }

    listing
}
