//! Path helpers shared by the views, the watcher and the search pipeline.
//!
//! Everything the server shows is addressed by a root-relative URL path
//! with a leading `/` and forward slashes, regardless of platform.

use std::path::{Component, Path, PathBuf};

/// Join a decoded request path under `root`.
///
/// Returns `None` when the path would escape the root (`..`, drive
/// prefixes, a second root). `.` segments are ignored.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let trimmed = request_path.trim_start_matches(['/', '\\']);

    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(resolved)
}

/// Root-relative URL path of `path`, e.g. `/docs/intro.md`.
///
/// The root itself maps to `/`. Returns `None` if `path` is not under `root`.
pub fn relative_url(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let relative = to_forward_slashes(&relative.to_string_lossy());
    let relative = relative.trim_matches('/');

    Some(format!("/{relative}"))
}

/// Replace Windows separators with `/`.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Percent-decode a URL path. Invalid UTF-8 after decoding leaves the input as is.
pub fn decode_url_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Percent-encode each segment of a URL path, keeping the `/` separators.
///
/// Used for `Location` headers, which must stay ASCII.
pub fn encode_url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
