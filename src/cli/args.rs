//! CLI argument parsing using clap.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

const AFTER_HELP: &str = "\
Quick Start:
  $ markview                         # Serve the current directory
  $ markview serve ~/notes           # Serve another directory
  $ markview serve --bind 127.0.0.1:9000 --no-reload
  $ markview init                    # Write .markview/settings.toml";

/// Local markdown browser with live reload and search
#[derive(Parser)]
#[command(
    name = "markview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse a markdown tree in the browser, with live reload and search",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `serve` in the current directory
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve a directory
    #[command(about = "Serve a directory of markdown over HTTP")]
    Serve(ServeOptions),

    /// Show active settings
    #[command(about = "Display the effective settings as TOML")]
    Config,

    /// Initialize project
    #[command(about = "Set up .markview directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Overrides for `serve`. Anything left unset comes from the settings.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeOptions {
    /// Directory to serve (default: settings `root`, else current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Address of the content server
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Address of the live-reload endpoint
    #[arg(long, value_name = "ADDR")]
    pub reload_bind: Option<String>,

    /// Do not watch the tree for changes
    #[arg(long)]
    pub no_watch: bool,

    /// Do not start the live-reload endpoint
    #[arg(long)]
    pub no_reload: bool,
}
