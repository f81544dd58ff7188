//! Serve command - apply CLI overrides and run the server.

use crate::cli::ServeOptions;
use crate::config::Settings;

/// Fold command-line overrides into the loaded settings.
pub fn apply_overrides(mut config: Settings, options: ServeOptions) -> Settings {
    if let Some(root) = options.root {
        config.root = Some(root);
    }
    if let Some(bind) = options.bind {
        config.server.bind = bind;
    }
    if let Some(bind) = options.reload_bind {
        config.reload.bind = bind;
    }
    if options.no_watch {
        config.watch.enabled = false;
    }
    if options.no_reload {
        config.reload.enabled = false;
    }
    config
}

/// Run the serve command.
pub async fn run(options: ServeOptions, config: Settings) -> anyhow::Result<()> {
    let config = apply_overrides(config, options);
    crate::server::serve(config).await
}
