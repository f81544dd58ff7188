//! Path classification: which view renders a request path.
//!
//! Classification looks only at existence, the directory flag and the
//! lower-cased extension. File contents are never inspected.

use std::path::Path;

use super::ViewError;
use crate::paths;

/// URL prefix that routes a request to the search view.
pub const SEARCH_PREFIX: &str = "/_search";

/// Extensions rendered as markdown documents.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mkd", "markdown"];

/// Extensions served verbatim as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png"];

/// Rendering strategy for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Directory,
    MarkdownDocument,
    PlainFile,
    Image,
    SearchResults,
}

impl ViewKind {
    /// Classify an existing entry from its directory flag and extension.
    pub fn from_entry(is_dir: bool, extension: Option<&str>) -> Self {
        if is_dir {
            return ViewKind::Directory;
        }
        match extension {
            Some(ext) if has_extension(IMAGE_EXTENSIONS, ext) => ViewKind::Image,
            Some(ext) if has_extension(MARKDOWN_EXTENSIONS, ext) => ViewKind::MarkdownDocument,
            _ => ViewKind::PlainFile,
        }
    }
}

fn has_extension(set: &[&str], ext: &str) -> bool {
    set.iter().any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Extension of `path` without the dot, as written on disk.
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Whether `path` carries one of the markdown extensions (any case).
pub fn is_markdown(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| has_extension(MARKDOWN_EXTENSIONS, ext))
}

/// Hidden and system-namespace entries (`.git`, `_drafts`) are never listed.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Whether a request path targets the search view.
pub fn is_search_path(request_path: &str) -> bool {
    request_path == SEARCH_PREFIX
        || request_path
            .strip_prefix(SEARCH_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Classify `request_path` under `root`.
///
/// Fails with [`ViewError::NotFound`] when the joined path does not exist
/// or escapes the root.
pub fn classify(root: &Path, request_path: &str) -> Result<ViewKind, ViewError> {
    if is_search_path(request_path) {
        return Ok(ViewKind::SearchResults);
    }

    let target = paths::resolve(root, request_path).ok_or(ViewError::NotFound)?;
    let metadata = std::fs::metadata(&target).map_err(|_| ViewError::NotFound)?;

    Ok(ViewKind::from_entry(metadata.is_dir(), extension_of(&target)))
}
