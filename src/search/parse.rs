//! Parsing and grouping of search tool output.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::paths::to_forward_slashes;

static DRIVE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]:").expect("static drive prefix pattern"));

/// One line of tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResultLine {
    /// A `path:line:content` hit. `file` is root-relative without a leading slash.
    Record {
        file: String,
        line_number: u64,
        snippet: String,
    },
    /// Anything that did not parse as a hit under the root (tool diagnostics).
    Raw(String),
}

/// Output unit of the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchItem {
    Heading {
        file: String,
    },
    Match {
        file: String,
        line_number: u64,
        snippet: String,
    },
    Raw(String),
}

/// Drop a leading drive letter and turn backslashes into slashes.
pub fn normalize(line: &str) -> String {
    to_forward_slashes(&DRIVE_PREFIX.replace(line, ""))
}

/// Turns raw tool lines into [`SearchResultLine`]s relative to the root.
#[derive(Debug, Clone)]
pub struct LineParser {
    root: String,
}

impl LineParser {
    pub fn new(root: &Path) -> Self {
        let root = normalize(&root.to_string_lossy());
        let root = match root.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };
        Self { root }
    }

    pub fn parse(&self, raw: &str) -> SearchResultLine {
        let line = normalize(raw.trim_end_matches(['\r', '\n']));

        let mut parts = line.splitn(3, ':');
        let (Some(path), Some(number), Some(snippet)) = (parts.next(), parts.next(), parts.next())
        else {
            return SearchResultLine::Raw(line);
        };

        let (Some(file), Ok(line_number)) = (self.relativize(path), number.trim().parse::<u64>())
        else {
            return SearchResultLine::Raw(line);
        };

        SearchResultLine::Record {
            file,
            line_number,
            snippet: snippet.to_string(),
        }
    }

    /// Root-relative form of a path printed by the tool.
    ///
    /// Absolute paths must sit under the root. Relative paths are taken as
    /// relative to the root, which is the child's working directory.
    fn relativize(&self, path: &str) -> Option<String> {
        let candidate = Path::new(path);
        let relative = if candidate.is_absolute() || path.starts_with('/') {
            candidate.strip_prefix(&self.root).ok()?
        } else {
            candidate
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }
}

/// Emits a file heading whenever a record's file differs from the previous one.
#[derive(Debug, Default)]
pub struct SearchGrouper {
    current_file: Option<String>,
}

impl SearchGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: SearchResultLine) -> Vec<SearchItem> {
        match line {
            SearchResultLine::Record {
                file,
                line_number,
                snippet,
            } => {
                let mut items = Vec::with_capacity(2);
                if self.current_file.as_deref() != Some(file.as_str()) {
                    self.current_file = Some(file.clone());
                    items.push(SearchItem::Heading { file: file.clone() });
                }
                items.push(SearchItem::Match {
                    file,
                    line_number,
                    snippet,
                });
                items
            }
            SearchResultLine::Raw(text) => vec![SearchItem::Raw(text)],
        }
    }
}
