//! Process-level server: both listeners, the watcher, and shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::router::{AppState, content_router};
use crate::config::Settings;
use crate::reload::{ReloadBroadcaster, reload_router};
use crate::search::SearchRunner;
use crate::view::{CommonMarkRenderer, Layout, ViewDispatcher};
use crate::watcher::ReloadWatcher;

/// Serve `settings.root` until Ctrl+C or a listener fails.
///
/// Fails if either listener cannot bind.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let root = settings
        .resolved_root()
        .context("cannot resolve the directory to serve")?;

    let reload_port = if settings.reload.enabled {
        settings.reload.port()
    } else {
        None
    };

    let dispatcher = ViewDispatcher::new(
        &root,
        Arc::new(CommonMarkRenderer),
        SearchRunner::new(&root, &settings.search),
    );
    let state = AppState::new(dispatcher, Layout::new(reload_port));

    let content_listener = TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("cannot bind content server to {}", settings.server.bind))?;

    let reload_listener = if settings.reload.enabled {
        let listener = TcpListener::bind(&settings.reload.bind)
            .await
            .with_context(|| format!("cannot bind reload endpoint to {}", settings.reload.bind))?;
        Some(listener)
    } else {
        None
    };

    let broadcaster = ReloadBroadcaster::default();
    let cancel = CancellationToken::new();
    let mut servers = JoinSet::new();

    crate::log_event!(
        "server",
        "serving",
        "{} on http://{}",
        root.display(),
        content_listener.local_addr()?
    );
    let app = content_router(state).into_make_service_with_connect_info::<SocketAddr>();
    let shutdown = cancel.clone().cancelled_owned();
    servers.spawn(async move {
        axum::serve(content_listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    });

    if let Some(listener) = reload_listener {
        crate::log_event!("reload", "listening", "ws://{}/livereload", listener.local_addr()?);
        let app = reload_router(broadcaster.clone());
        let shutdown = cancel.clone().cancelled_owned();
        servers.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
        });
    }

    let watcher = if settings.watch.enabled {
        match ReloadWatcher::builder()
            .root(&root)
            .broadcaster(broadcaster.clone())
            .build()
        {
            Ok(watcher) => Some(watcher.start()),
            Err(e) => {
                tracing::warn!("[watcher] disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                crate::log_event!("server", "shutting down");
                signal.cancel();
            }
            Err(e) => tracing::warn!("[server] cannot listen for Ctrl+C: {e}"),
        }
    });

    // The first listener to stop takes the other one down with it.
    let mut outcome = Ok(());
    while let Some(joined) = servers.join_next().await {
        cancel.cancel();
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => outcome = Err(anyhow::Error::new(e).context("listener failed")),
            Err(e) => outcome = Err(anyhow::anyhow!("listener task failed: {e}")),
        }
    }

    if let Some(handle) = watcher {
        handle.stop().await;
    }

    crate::log_event!("server", "stopped");
    outcome
}
