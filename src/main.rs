use clap::Parser;
use markview::Settings;
use markview::cli::commands;
use markview::cli::{Cli, Commands, ServeOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = config.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration.");
        Settings::default()
    });

    markview::logging::init_with_config(&config.logging);

    match cli.command {
        Some(Commands::Init { force }) => {
            let dir = std::env::current_dir()?;
            commands::init::run_init(&dir, force)
        }
        Some(Commands::Config) => commands::init::run_config(&config),
        Some(Commands::Serve(options)) => commands::serve::run(options, config).await,
        None => commands::serve::run(ServeOptions::default(), config).await,
    }
}
