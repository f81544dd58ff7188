//! Watch loop that converts raw filesystem events into reload events.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::WatchError;
use super::tree::watch_directories;
use crate::paths;
use crate::reload::{ReloadBroadcaster, ReloadEvent};

/// Capacity of the channel between notify's thread and the watch loop.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Reload path for a raw event path: root-relative, forward slashes,
/// leading `/`. `None` if the path is outside the root.
pub fn reload_path(root: &Path, path: &Path) -> Option<String> {
    paths::relative_url(root, path)
}

fn triggers_reload(kind: &EventKind) -> bool {
    // Renames arrive as Modify(Name).
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Filesystem watcher feeding the reload channel.
pub struct ReloadWatcher {
    root: PathBuf,
    broadcaster: ReloadBroadcaster,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    watcher: notify::RecommendedWatcher,
}

impl ReloadWatcher {
    /// Create a builder for configuring the watcher.
    pub fn builder() -> ReloadWatcherBuilder {
        ReloadWatcherBuilder::new()
    }

    /// Subscribe every directory under the root and spawn the watch loop.
    ///
    /// Subscriptions are in place when this returns. Failing directories
    /// are logged and skipped.
    pub fn start(mut self) -> WatcherHandle {
        let dirs = watch_directories(&self.root);
        let mut watched = 0;
        for dir in &dirs {
            match self.watch_directory(dir) {
                Ok(()) => watched += 1,
                Err(e) => tracing::warn!("[watcher] {e}"),
            }
        }
        crate::log_event!(
            "watcher",
            "started",
            "{watched} directories under {}",
            self.root.display()
        );

        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        WatcherHandle { cancel, task }
    }

    fn watch_directory(&mut self, dir: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
        crate::debug_event!("watcher", "watching", "{}", dir.display());
        Ok(())
    }

    /// Event loop. Runs until the token is cancelled.
    async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                received = self.event_rx.recv() => match received {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => {
                        let error = WatchError::EventError { details: e.to_string() };
                        tracing::warn!("[watcher] {error}");
                    }
                    None => {
                        tracing::warn!("[watcher] event source closed");
                        break;
                    }
                },
            }
        }

        crate::log_event!("watcher", "stopped");
    }

    fn handle_event(&self, event: Event) {
        if !triggers_reload(&event.kind) {
            return;
        }

        for path in &event.paths {
            let Some(url) = reload_path(&self.root, path) else {
                crate::debug_event!("watcher", "outside root", "{}", path.display());
                continue;
            };
            crate::log_event!("watcher", "reload", "{url}");
            self.broadcaster.notify(ReloadEvent::full_page(url));
        }
    }
}

/// Running watch loop.
pub struct WatcherHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Stop the loop and wait for it to finish. Drops all subscriptions.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("[watcher] task ended abnormally: {e}");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Builder for constructing a ReloadWatcher.
pub struct ReloadWatcherBuilder {
    root: Option<PathBuf>,
    broadcaster: Option<ReloadBroadcaster>,
}

impl ReloadWatcherBuilder {
    pub fn new() -> Self {
        Self {
            root: None,
            broadcaster: None,
        }
    }

    /// Directory to watch. Should be canonical so event paths relativize.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn broadcaster(mut self, broadcaster: ReloadBroadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn build(self) -> Result<ReloadWatcher, WatchError> {
        let root = self.root.ok_or_else(|| WatchError::InitFailed {
            reason: "Root is required".to_string(),
        })?;

        let broadcaster = self.broadcaster.ok_or_else(|| WatchError::InitFailed {
            reason: "Broadcaster is required".to_string(),
        })?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        Ok(ReloadWatcher {
            root,
            broadcaster,
            event_rx: rx,
            watcher,
        })
    }
}

impl Default for ReloadWatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::broadcast;
    use tokio::time::timeout;

    async fn wait_for(rx: &mut broadcast::Receiver<ReloadEvent>, path: &str) -> bool {
        let wanted = async {
            loop {
                match rx.recv().await {
                    Ok(event) if event.path == path => return true,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return false,
                }
            }
        };
        timeout(Duration::from_secs(5), wanted).await.unwrap_or(false)
    }

    #[test]
    fn test_reload_path_normalization() {
        let root = Path::new("/srv/notes");
        assert_eq!(
            reload_path(root, &root.join("sub\\dir\\file.md")).as_deref(),
            Some("/sub/dir/file.md")
        );
        assert_eq!(
            reload_path(root, &root.join("a/b.md")).as_deref(),
            Some("/a/b.md")
        );
        assert_eq!(reload_path(root, Path::new("/other/x.md")), None);
    }

    #[test]
    fn test_access_events_ignored() {
        use notify::event::{AccessKind, CreateKind, ModifyKind, RenameMode};
        assert!(!triggers_reload(&EventKind::Access(AccessKind::Any)));
        assert!(triggers_reload(&EventKind::Create(CreateKind::File)));
        assert!(triggers_reload(&EventKind::Modify(ModifyKind::Name(
            RenameMode::Both
        ))));
    }

    #[test]
    fn test_build_requires_root_and_broadcaster() {
        assert!(ReloadWatcher::builder().build().is_err());
        assert!(
            ReloadWatcher::builder()
                .root("/tmp")
                .build()
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_change_under_root_is_broadcast() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir(root.join("sub")).unwrap();

        let broadcaster = ReloadBroadcaster::new(64);
        let mut rx = broadcaster.subscribe();
        let handle = ReloadWatcher::builder()
            .root(&root)
            .broadcaster(broadcaster)
            .build()
            .unwrap()
            .start();

        fs::write(root.join("sub/note.md"), "# changed").unwrap();
        assert!(wait_for(&mut rx, "/sub/note.md").await);

        assert!(handle.is_running());
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_late_directories_are_not_watched() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();

        let broadcaster = ReloadBroadcaster::new(64);
        let mut rx = broadcaster.subscribe();
        let handle = ReloadWatcher::builder()
            .root(&root)
            .broadcaster(broadcaster)
            .build()
            .unwrap()
            .start();

        fs::create_dir(root.join("late")).unwrap();
        assert!(wait_for(&mut rx, "/late").await);

        fs::write(root.join("late/x.md"), "x").unwrap();
        let seen = timeout(Duration::from_millis(500), wait_for(&mut rx, "/late/x.md")).await;
        assert!(!matches!(seen, Ok(true)));

        handle.stop().await;
    }
}
