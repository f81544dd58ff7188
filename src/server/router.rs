//! Routes of the content listener.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use serde::Deserialize;

use super::request_log::log_request;
use super::response::view_response;
use crate::assets;
use crate::paths;
use crate::view::{Layout, ViewDispatcher};

/// Shared, immutable state of the content server.
#[derive(Clone)]
pub struct AppState {
    dispatcher: ViewDispatcher,
    layout: Arc<Layout>,
}

impl AppState {
    pub fn new(dispatcher: ViewDispatcher, layout: Layout) -> Self {
        Self {
            dispatcher,
            layout: Arc::new(layout),
        }
    }
}

/// Build the content router. Every route accepts any method.
pub fn content_router(state: AppState) -> Router {
    Router::new()
        .route("/_assets/{*name}", any(asset))
        .fallback(content)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn asset(Path(name): Path<String>) -> Response {
    assets::asset_response(&name)
}

#[derive(Debug, Default, Deserialize)]
struct SearchForm {
    word: Option<String>,
}

/// Search query from a form body, falling back to the query string.
fn search_word(query: Option<&str>, body: &[u8]) -> Option<String> {
    let from_body = serde_urlencoded::from_bytes::<SearchForm>(body)
        .ok()
        .and_then(|form| form.word);

    from_body.or_else(|| {
        query
            .and_then(|q| serde_urlencoded::from_str::<SearchForm>(q).ok())
            .and_then(|form| form.word)
    })
}

async fn content(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    let request_path = paths::decode_url_path(uri.path());
    let word = search_word(uri.query(), &body);

    let dispatcher = state.dispatcher.clone();
    let dispatched = tokio::task::spawn_blocking(move || {
        dispatcher.dispatch(&request_path, word.as_deref())
    })
    .await;

    match dispatched {
        Ok(Ok(view)) => view_response(&state.layout, view).await,
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            tracing::error!("[http] dispatch task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_from_query() {
        assert_eq!(
            search_word(Some("word=hello+world"), b"").as_deref(),
            Some("hello world")
        );
        assert_eq!(search_word(Some("other=1"), b""), None);
        assert_eq!(search_word(None, b""), None);
    }

    #[test]
    fn test_word_from_form_body_wins() {
        assert_eq!(
            search_word(Some("word=query"), b"word=caf%C3%A9").as_deref(),
            Some("café")
        );
    }
}
