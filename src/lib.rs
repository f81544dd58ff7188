pub mod assets;
pub mod cli;
pub mod config;
pub mod logging;
pub mod paths;
pub mod reload;
pub mod search;
pub mod server;
pub mod view;
pub mod watcher;

pub use config::Settings;
pub use reload::{ReloadBroadcaster, ReloadEvent};
pub use search::{SearchRunner, SearchStream};
pub use view::{ViewDispatcher, ViewError, ViewKind};
pub use watcher::{ReloadWatcher, WatcherHandle};
