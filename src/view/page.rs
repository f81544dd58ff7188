//! Page model and the HTML layout every view shares.
//!
//! The layout is compiled into the binary by maud, so there is no template
//! registry to load or mutate at runtime.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::breadcrumb::BreadcrumbTrail;
use super::listing::DirectoryListing;
use crate::paths::encode_url_path;
use crate::search::SearchItem;

/// Suffix appended to every page title.
pub const TITLE_SUFFIX: &str = "markview";

/// Placeholder separating the streamed search results from the page frame.
const RESULTS_SLOT: &str = "<!--markview:results-->";

/// Everything a page shows besides its body.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub title: String,
    /// Form action of the search box, scoped to the current directory.
    pub search_action: String,
    pub breadcrumb: BreadcrumbTrail,
    pub body: PageBody,
}

#[derive(Debug, Clone)]
pub enum PageBody {
    Listing(DirectoryListing),
    /// Already-rendered HTML from the markdown renderer.
    Document(String),
    /// Raw file text, escaped on output.
    Code(String),
    /// Header of a search page; results are streamed into the slot after it.
    Search { word: String },
}

impl PageModel {
    pub fn title_for(name: &str) -> String {
        format!("{name} - {TITLE_SUFFIX}")
    }
}

/// Immutable page renderer built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    reload_port: Option<u16>,
}

impl Layout {
    /// `reload_port` is the port of the live-reload endpoint, or `None` to
    /// leave the reload client out of the pages. Code highlighting is
    /// always included.
    pub fn new(reload_port: Option<u16>) -> Self {
        Self { reload_port }
    }

    pub fn render(&self, model: &PageModel) -> String {
        self.document(model).into_string()
    }

    /// Render the page frame around the search results slot.
    ///
    /// Returns the markup before and after the slot so the caller can
    /// stream results in between.
    pub fn render_split(&self, model: &PageModel) -> (String, String) {
        let page = self.render(model);
        match page.split_once(RESULTS_SLOT) {
            Some((head, tail)) => (head.to_string(), tail.to_string()),
            None => (page, String::new()),
        }
    }

    fn document(&self, model: &PageModel) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (model.title) }
                    link rel="stylesheet" href="/_assets/style.css" media="all";
                    script src="/_assets/prettify.js" defer {}
                    script src="/_assets/markview.js" data-livereload-port=[self.reload_port] defer {}
                }
                body {
                    div.menu {
                        nav.breadcrumb {
                            @for crumb in model.breadcrumb.crumbs() {
                                a href=(encode_url_path(&crumb.path)) { (crumb.label) } "/"
                            }
                        }
                        form.search action=(model.search_action) method="post" {
                            input type="text" name="word" size="20";
                            input type="submit" value="Search";
                        }
                    }
                    div.container {
                        div.markdown-body {
                            (body(&model.body))
                        }
                    }
                }
            }
        }
    }
}

fn body(body: &PageBody) -> Markup {
    match body {
        PageBody::Listing(listing) => html! {
            h4 { "Directory" }
            ul {
                @for dir in &listing.dirs {
                    li { a href=(encode_url_path(dir)) { (basename(dir)) "/" } }
                }
            }
            h4 { "Markdown" }
            ul {
                @for file in &listing.files {
                    li { a href=(encode_url_path(file)) { (basename(file)) } }
                }
            }
        },
        PageBody::Document(rendered) => html! { (PreEscaped(rendered)) },
        PageBody::Code(text) => html! {
            pre.prettyprint { code { (text) } }
        },
        PageBody::Search { word } => html! {
            h2 { "Search results for " q { (word) } }
            div.search-results { (PreEscaped(RESULTS_SLOT)) }
        },
    }
}

/// Markup for one streamed search item.
pub fn search_item(item: &SearchItem) -> String {
    let markup = match item {
        SearchItem::Heading { file } => html! {
            h4.search-file { a href=(encode_url_path(&format!("/{file}"))) { (file) } }
        },
        SearchItem::Match {
            line_number,
            snippet,
            ..
        } => html! {
            div.search-line {
                span.line-number { (line_number) }
                " : "
                span.snippet { (snippet) }
            }
        },
        SearchItem::Raw(line) => html! {
            div.search-raw { (line) }
        },
    };
    let mut rendered = markup.into_string();
    rendered.push('\n');
    rendered
}

fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
