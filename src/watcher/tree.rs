//! Directory discovery for the initial watch set.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Every directory under `root`, `root` included.
///
/// Unreadable subtrees are logged and skipped.
pub fn watch_directories(root: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!("[watcher] skipping unreadable path: {e}"),
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_root_and_nested_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join("a/file.md"), "x").unwrap();

        let mut dirs = watch_directories(root);
        dirs.sort();

        let mut expected = vec![
            root.to_path_buf(),
            root.join(".git"),
            root.join("a"),
            root.join("a/b"),
        ];
        expected.sort();
        assert_eq!(dirs, expected);
    }
}
