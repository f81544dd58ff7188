//! Filesystem watcher that turns changes under the root into reload events.
//!
//! # Architecture
//!
//! ```text
//! notify::RecommendedWatcher (one NonRecursive watch per directory)
//!         | callback thread
//!         v
//! mpsc channel -> ReloadWatcher loop (tokio task, CancellationToken)
//!                      |
//!                      v
//!               ReloadBroadcaster::notify("/sub/file.md")
//! ```
//!
//! The set of watched directories is fixed when the watcher starts.
//! Directories created later are not watched until the next start.

mod error;
mod reload_watcher;
mod tree;

pub use error::WatchError;
pub use reload_watcher::{ReloadWatcher, ReloadWatcherBuilder, WatcherHandle, reload_path};
pub use tree::watch_directories;
