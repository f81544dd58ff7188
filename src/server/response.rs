//! Turning views and view errors into HTTP responses.

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use tokio_util::io::ReaderStream;

use crate::paths;
use crate::search::SearchGrouper;
use crate::view::{Layout, SearchPage, View, ViewError, search_item};

/// Body of every 404.
pub const NOT_FOUND_BODY: &str = "404 page not found";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            ViewError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            ViewError::ToolUnavailable { tool, reason } => {
                tracing::warn!("[http] search tool '{tool}' unavailable: {reason}");
                (
                    StatusCode::NOT_FOUND,
                    format!("{NOT_FOUND_BODY} ({tool} not found)"),
                )
                    .into_response()
            }
            ViewError::Io { message } => {
                tracing::warn!("[http] {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            ViewError::Render { reason } => {
                tracing::warn!("[http] render failed: {reason}");
                (StatusCode::INTERNAL_SERVER_ERROR, reason).into_response()
            }
        }
    }
}

/// Write a dispatched view.
pub async fn view_response(layout: &Layout, view: View) -> Response {
    match view {
        View::Redirect(location) => redirect(&location),
        View::Page(model) => Html(layout.render(&model)).into_response(),
        View::Image { path, content_type } => match tokio::fs::File::open(&path).await {
            Ok(file) => (
                [(header::CONTENT_TYPE, content_type)],
                Body::from_stream(ReaderStream::new(file)),
            )
                .into_response(),
            Err(e) => ViewError::from(e).into_response(),
        },
        View::Search(page) => search_response(layout, page),
    }
}

/// 302 to a root-relative URL, percent-encoded so the header stays ASCII.
pub fn redirect(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, paths::encode_url_path(location))],
    )
        .into_response()
}

/// Stream the page frame with search results in its slot.
///
/// Each chunk is produced only when the client pulls it, so the tool is
/// read at the client's pace. Dropping the body drops the stream, which
/// kills the child.
fn search_response(layout: &Layout, page: SearchPage) -> Response {
    let (head, tail) = layout.render_split(&page.model);
    let mut lines = page.stream;

    let body = async_stream::stream! {
        yield Ok::<_, Infallible>(Bytes::from(head));

        let mut grouper = SearchGrouper::new();
        while let Some(line) = lines.next_line().await {
            let chunk: String = grouper.push(line).iter().map(search_item).collect();
            yield Ok(Bytes::from(chunk));
        }

        yield Ok(Bytes::from(tail));
    };

    (
        [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
        Body::from_stream(body),
    )
        .into_response()
}
