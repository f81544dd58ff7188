//! HTTP surface of the content server.
//!
//! | Path | Behavior |
//! |---|---|
//! | `/_assets/<name>` | embedded static asset, 404 if missing |
//! | `/_search/<scope>?word=` | streamed search page, redirect to scope on empty word |
//! | `/*` | [`ViewDispatcher`](crate::view::ViewDispatcher) |
//!
//! The reload endpoint (`/livereload.js`, `/livereload`) is a separate
//! router on its own listener, see [`crate::reload`].

mod request_log;
mod response;
mod router;
mod run;

pub use response::NOT_FOUND_BODY;
pub use router::{AppState, content_router};
pub use run::serve;
