//! Init and Config commands.

use std::path::Path;

use anyhow::anyhow;

use crate::config::Settings;

/// Run init command - create configuration file in `dir`.
pub fn run_init(dir: &Path, force: bool) -> anyhow::Result<()> {
    let path = Settings::init_config_file(dir, force).map_err(|e| anyhow!("{e}"))?;
    println!("Created configuration file at: {}", path.display());
    println!("Edit this file to customize your settings.");
    Ok(())
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings) -> anyhow::Result<()> {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
