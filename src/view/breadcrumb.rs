//! Breadcrumb trail shown atop every page.

/// Path of the fixed first crumb.
pub const ROOT_PATH: &str = "/";

/// Label of the fixed first crumb.
pub const ROOT_LABEL: &str = "[TOP]";

/// One ancestor link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub path: String,
    pub label: String,
}

impl Crumb {
    fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

/// Ordered ancestor links, always starting at the root crumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbTrail(Vec<Crumb>);

impl BreadcrumbTrail {
    pub fn crumbs(&self) -> &[Crumb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true: the root crumb is always present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the deepest crumb.
    pub fn current(&self) -> &str {
        self.0.last().map_or(ROOT_PATH, |crumb| crumb.path.as_str())
    }
}

/// Build the trail for a root-relative directory path.
///
/// `""`, `"/"` and `"."` denote the root. Segments keep their order and
/// repeats; empty segments (doubled or trailing slashes) are skipped.
pub fn build(root_relative_dir: &str) -> BreadcrumbTrail {
    let mut crumbs = vec![Crumb::new(ROOT_PATH, ROOT_LABEL)];

    let dir = root_relative_dir.replace('\\', "/");
    if matches!(dir.as_str(), "" | "/" | ".") {
        return BreadcrumbTrail(crumbs);
    }

    let dir = dir.strip_prefix('/').unwrap_or(&dir);
    let mut prefix = String::new();
    for segment in dir.split('/').filter(|segment| !segment.is_empty()) {
        prefix.push('/');
        prefix.push_str(segment);
        crumbs.push(Crumb::new(prefix.clone(), segment));
    }

    BreadcrumbTrail(crumbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(trail: &BreadcrumbTrail) -> Vec<(&str, &str)> {
        trail
            .crumbs()
            .iter()
            .map(|c| (c.path.as_str(), c.label.as_str()))
            .collect()
    }

    #[test]
    fn test_root_forms_yield_single_crumb() {
        for input in ["", "/", "."] {
            let trail = build(input);
            assert_eq!(pairs(&trail), vec![("/", "[TOP]")], "input {input:?}");
        }
    }

    #[test]
    fn test_nested_path() {
        let trail = build("/a/b");
        assert_eq!(pairs(&trail), vec![("/", "[TOP]"), ("/a", "a"), ("/a/b", "b")]);
        assert_eq!(trail.current(), "/a/b");
    }

    #[test]
    fn test_without_leading_slash() {
        assert_eq!(build("a/b"), build("/a/b"));
    }

    #[test]
    fn test_repeated_segments_kept_in_order() {
        let trail = build("/x/x/y");
        assert_eq!(
            pairs(&trail),
            vec![("/", "[TOP]"), ("/x", "x"), ("/x/x", "x"), ("/x/x/y", "y")]
        );
    }

    #[test]
    fn test_length_matches_non_empty_segments() {
        let trail = build("/a//b/");
        assert_eq!(trail.len(), 3);
        for window in trail.crumbs().windows(2) {
            assert!(window[1].path.starts_with(&window[0].path));
            assert!(window[1].path.len() > window[0].path.len());
        }
    }

    #[test]
    fn test_backslashes_are_separators() {
        assert_eq!(build("a\\b"), build("/a/b"));
    }
}
