//! Reload channel: delivers "this path changed" to connected browsers.
//!
//! The watcher is the only producer. Every browser connection on the
//! reload endpoint holds its own broadcast receiver, so one change reaches
//! all open pages.

mod broadcast;
mod protocol;
mod server;

pub use broadcast::{ReloadBroadcaster, ReloadEvent};
pub use protocol::{ClientMessage, ServerMessage, PROTOCOL_V7};
pub use server::{reload_router, LIVERELOAD_SCRIPT};
