//! Logging setup and event macros.
//!
//! Compact timestamped output with per-module level configuration.
//! `RUST_LOG` overrides the config file.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "info"   # request log and reloads
//!
//! [logging.modules]
//! watcher = "debug"  # every raw filesystem event
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=debug markview
//! RUST_LOG=warn,markview::server=info markview serve ~/notes
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Build the filter directive string from config.
///
/// Bare module names are scoped to this crate, so `watcher = "debug"`
/// becomes `markview::watcher=debug`. Names containing `::` pass through.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.default.clone();
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();
    for (module, level) in modules {
        if module.contains("::") {
            filter_str.push_str(&format!(",{module}={level}"));
        } else {
            filter_str.push_str(&format!(",{}::{module}={level}", env!("CARGO_CRATE_NAME")));
        }
    }
    filter_str
}

/// Initialize logging with configuration.
///
/// Only the first call takes effect.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event with component context.
///
/// # Examples
/// ```ignore
/// log_event!("watcher", "reload", "{}", path);
/// log_event!("server", "stopped");
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
///
/// # Examples
/// ```ignore
/// debug_event!("search", "spawn", "{program} {args:?}");
/// ```
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        let mut config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), "info");

        config.modules.insert("watcher".to_string(), "debug".to_string());
        config.modules.insert("tower_http::trace".to_string(), "warn".to_string());
        assert_eq!(
            filter_directives(&config),
            "info,tower_http::trace=warn,markview::watcher=debug"
        );
    }
}
