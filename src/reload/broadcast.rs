//! Broadcast channel for reload events.

use tokio::sync::broadcast;

/// A watched path changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadEvent {
    /// Root-relative URL path with a leading `/`.
    pub path: String,
    /// Let clients swap stylesheets in place instead of reloading the page.
    pub live_css: bool,
}

impl ReloadEvent {
    /// Event asking for a full page reload.
    pub fn full_page(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            live_css: false,
        }
    }
}

/// Fans reload events out to every subscribed browser connection.
#[derive(Debug, Clone)]
pub struct ReloadBroadcaster {
    sender: broadcast::Sender<ReloadEvent>,
}

impl ReloadBroadcaster {
    /// Create a new broadcaster with specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send an event to all subscribers. Having none is fine.
    pub fn notify(&self, event: ReloadEvent) {
        match self.sender.send(event) {
            Ok(count) => {
                crate::debug_event!("reload", "sent", "to {count} clients");
            }
            Err(broadcast::error::SendError(event)) => {
                crate::debug_event!("reload", "dropped", "no clients for {}", event.path);
            }
        }
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.sender.subscribe()
    }

    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let broadcaster = ReloadBroadcaster::new(8);
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();
        assert_eq!(broadcaster.client_count(), 2);

        broadcaster.notify(ReloadEvent::full_page("/a.md"));

        assert_eq!(first.recv().await.unwrap().path, "/a.md");
        let event = second.recv().await.unwrap();
        assert_eq!(event.path, "/a.md");
        assert!(!event.live_css);
    }

    #[test]
    fn test_notify_without_subscribers() {
        let broadcaster = ReloadBroadcaster::new(8);
        broadcaster.notify(ReloadEvent::full_page("/a.md"));
        assert_eq!(broadcaster.client_count(), 0);
    }
}
