//! The dispatch state machine: one request path in, one [`View`] out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::breadcrumb;
use super::classify::{self, SEARCH_PREFIX, ViewKind};
use super::error::ViewError;
use super::listing;
use super::markdown::MarkdownRenderer;
use super::page::{PageBody, PageModel};
use crate::paths;
use crate::search::{SearchRunner, SearchStream};

/// Result of dispatching one request.
#[derive(Debug)]
pub enum View {
    /// Send the client elsewhere (directory index, empty search).
    Redirect(String),
    /// A full page to render with the layout.
    Page(PageModel),
    /// Stream the file verbatim, no page around it.
    Image { path: PathBuf, content_type: String },
    /// Page frame plus a live result stream to fill it.
    Search(SearchPage),
}

/// A search in progress.
#[derive(Debug)]
pub struct SearchPage {
    pub model: PageModel,
    pub stream: SearchStream,
}

/// Maps request paths to views under one root.
///
/// Holds no per-request state, so one instance serves every request.
#[derive(Clone)]
pub struct ViewDispatcher {
    root: PathBuf,
    renderer: Arc<dyn MarkdownRenderer>,
    search: SearchRunner,
}

impl ViewDispatcher {
    pub fn new(
        root: impl Into<PathBuf>,
        renderer: Arc<dyn MarkdownRenderer>,
        search: SearchRunner,
    ) -> Self {
        Self {
            root: root.into(),
            renderer,
            search,
        }
    }

    /// Dispatch a decoded request path. `word` is the search query, if any.
    ///
    /// Blocks on filesystem reads; call from a blocking context. Search
    /// spawns its child on the current tokio runtime.
    pub fn dispatch(&self, request_path: &str, word: Option<&str>) -> Result<View, ViewError> {
        let kind = classify::classify(&self.root, request_path)?;
        crate::debug_event!("dispatch", "classified", "{request_path} as {kind:?}");

        match kind {
            ViewKind::SearchResults => self.search_view(request_path, word),
            ViewKind::Directory => self.directory_view(&self.target(request_path)?),
            ViewKind::MarkdownDocument => {
                let target = self.target(request_path)?;
                let source = std::fs::read(&target)?;
                let rendered = self.renderer.render(&source)?;
                self.file_page(&target, PageBody::Document(rendered))
            }
            ViewKind::PlainFile => {
                let target = self.target(request_path)?;
                let bytes = std::fs::read(&target)?;
                let text = String::from_utf8_lossy(&bytes).into_owned();
                self.file_page(&target, PageBody::Code(text))
            }
            ViewKind::Image => {
                let path = self.target(request_path)?;
                let content_type = mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .to_string();
                Ok(View::Image { path, content_type })
            }
        }
    }

    fn target(&self, request_path: &str) -> Result<PathBuf, ViewError> {
        paths::resolve(&self.root, request_path).ok_or(ViewError::NotFound)
    }

    fn directory_view(&self, dir: &Path) -> Result<View, ViewError> {
        if let Some(index) = listing::index_redirect(&self.root, dir) {
            return Ok(View::Redirect(index));
        }

        let url = self.url_of(dir)?;
        let listing = listing::list(&self.root, dir);
        Ok(View::Page(PageModel {
            title: PageModel::title_for(&url),
            search_action: search_action(&url),
            breadcrumb: breadcrumb::build(&url),
            body: PageBody::Listing(listing),
        }))
    }

    /// Page for a file; the breadcrumb and search scope are its parent directory.
    fn file_page(&self, file: &Path, body: PageBody) -> Result<View, ViewError> {
        let url = self.url_of(file)?;
        let parent = file.parent().unwrap_or(&self.root);
        let parent_url = self.url_of(parent)?;

        Ok(View::Page(PageModel {
            title: PageModel::title_for(&url),
            search_action: search_action(&parent_url),
            breadcrumb: breadcrumb::build(&parent_url),
            body,
        }))
    }

    fn search_view(&self, request_path: &str, word: Option<&str>) -> Result<View, ViewError> {
        let scope_path = request_path
            .strip_prefix(SEARCH_PREFIX)
            .unwrap_or(request_path);
        let scope = paths::resolve(&self.root, scope_path).ok_or(ViewError::NotFound)?;
        let scope_url = self.url_of(&scope)?;

        let query = match word {
            Some(word) if !word.is_empty() => word,
            _ => return Ok(View::Redirect(scope_url)),
        };
        if !scope.exists() {
            return Err(ViewError::NotFound);
        }

        let stream = self.search.run(query, &scope)?;
        crate::log_event!("search", "started", "{query:?} in {scope_url}");

        let dir_url = if scope.is_dir() {
            scope_url.clone()
        } else {
            self.url_of(scope.parent().unwrap_or(&self.root))?
        };
        Ok(View::Search(SearchPage {
            model: PageModel {
                title: PageModel::title_for(&format!("{query} in {scope_url}")),
                search_action: search_action(&dir_url),
                breadcrumb: breadcrumb::build(&dir_url),
                body: PageBody::Search {
                    word: query.to_string(),
                },
            },
            stream,
        }))
    }

    fn url_of(&self, path: &Path) -> Result<String, ViewError> {
        paths::relative_url(&self.root, path).ok_or(ViewError::NotFound)
    }
}

/// Form action that searches under `dir_url`.
fn search_action(dir_url: &str) -> String {
    format!("{SEARCH_PREFIX}{}/", dir_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::view::CommonMarkRenderer;
    use std::fs;
    use tempfile::TempDir;

    fn dispatcher(root: &Path) -> ViewDispatcher {
        let config = SearchConfig {
            program: "markview-no-such-search-tool".to_string(),
            ..SearchConfig::default()
        };
        ViewDispatcher::new(
            root,
            Arc::new(CommonMarkRenderer),
            SearchRunner::new(root, &config),
        )
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("docs/guide")).unwrap();
        fs::create_dir(root.join("wiki")).unwrap();
        fs::write(root.join("docs/intro.md"), "# Intro\n\nHello").unwrap();
        fs::write(root.join("docs/guide/setup.txt"), "<b>raw</b>").unwrap();
        fs::write(root.join("docs/logo.PNG"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(root.join("wiki/index.md"), "# Home").unwrap();
        fs::write(root.join("wiki/other.md"), "# Other").unwrap();
        temp
    }

    fn page(view: View) -> PageModel {
        match view {
            View::Page(model) => model,
            other => panic!("expected page, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_listing_page() {
        let temp = fixture();
        let model = page(dispatcher(temp.path()).dispatch("/docs", None).unwrap());

        assert_eq!(model.title, "/docs - markview");
        assert_eq!(model.search_action, "/_search/docs/");
        assert_eq!(model.breadcrumb.current(), "/docs");
        match model.body {
            PageBody::Listing(listing) => {
                assert_eq!(listing.dirs, vec!["/docs/guide"]);
                assert_eq!(listing.files, vec!["/docs/intro.md"]);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_root_listing() {
        let temp = fixture();
        let model = page(dispatcher(temp.path()).dispatch("/", None).unwrap());
        assert_eq!(model.search_action, "/_search/");
        assert_eq!(model.breadcrumb.len(), 1);
    }

    #[test]
    fn test_index_redirect_beats_listing() {
        let temp = fixture();
        match dispatcher(temp.path()).dispatch("/wiki", None).unwrap() {
            View::Redirect(location) => assert_eq!(location, "/wiki/index.md"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_markdown_uses_parent_breadcrumb() {
        let temp = fixture();
        let model = page(dispatcher(temp.path()).dispatch("/docs/intro.md", None).unwrap());

        assert_eq!(model.breadcrumb.current(), "/docs");
        assert_eq!(model.search_action, "/_search/docs/");
        match model.body {
            PageBody::Document(html) => assert!(html.contains("<h1>Intro</h1>")),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_plain_file_is_code() {
        let temp = fixture();
        let model = page(
            dispatcher(temp.path())
                .dispatch("/docs/guide/setup.txt", None)
                .unwrap(),
        );
        assert_eq!(model.breadcrumb.current(), "/docs/guide");
        assert!(matches!(model.body, PageBody::Code(ref text) if text == "<b>raw</b>"));
    }

    #[test]
    fn test_image_has_no_page() {
        let temp = fixture();
        match dispatcher(temp.path()).dispatch("/docs/logo.PNG", None).unwrap() {
            View::Image { path, content_type } => {
                assert!(path.ends_with("docs/logo.PNG"));
                assert_eq!(content_type, "image/png");
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_escaping_paths() {
        let temp = fixture();
        let dispatcher = dispatcher(temp.path());
        assert!(matches!(
            dispatcher.dispatch("/nope.md", None),
            Err(ViewError::NotFound)
        ));
        assert!(matches!(
            dispatcher.dispatch("/../secret", None),
            Err(ViewError::NotFound)
        ));
        assert!(matches!(
            dispatcher.dispatch("/_search/nope", Some("x")),
            Err(ViewError::NotFound)
        ));
    }

    #[test]
    fn test_empty_search_redirects_to_scope() {
        let temp = fixture();
        let dispatcher = dispatcher(temp.path());

        match dispatcher.dispatch("/_search/docs/", Some("")).unwrap() {
            View::Redirect(location) => assert_eq!(location, "/docs"),
            other => panic!("expected redirect, got {other:?}"),
        }
        match dispatcher.dispatch("/_search", None).unwrap() {
            View::Redirect(location) => assert_eq!(location, "/"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_search_redirects_before_scope_check() {
        let temp = fixture();
        let dispatcher = dispatcher(temp.path());

        match dispatcher.dispatch("/_search/no/such/dir/", Some("")).unwrap() {
            View::Redirect(location) => assert_eq!(location, "/no/such/dir"),
            other => panic!("expected redirect, got {other:?}"),
        }
        assert!(matches!(
            dispatcher.dispatch("/_search/no/such/dir/", Some("x")),
            Err(ViewError::NotFound)
        ));
        assert!(matches!(
            dispatcher.dispatch("/_search/../", None),
            Err(ViewError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_whitespace_word_is_searched() {
        let temp = fixture();
        let result = dispatcher(temp.path()).dispatch("/_search/docs/", Some("  "));
        assert!(matches!(result, Err(ViewError::ToolUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_search_with_missing_tool() {
        let temp = fixture();
        let result = dispatcher(temp.path()).dispatch("/_search/docs/", Some("hello"));
        match result {
            Err(ViewError::ToolUnavailable { tool, .. }) => {
                assert_eq!(tool, "markview-no-such-search-tool");
            }
            other => panic!("expected ToolUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_search_action_format() {
        assert_eq!(search_action("/"), "/_search/");
        assert_eq!(search_action("/a/b"), "/_search/a/b/");
    }
}
