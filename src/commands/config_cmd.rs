use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;

fn target_file(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_file(),
    }
}

pub fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn edit_config(config_path: Option<&Path>) -> Result<()> {
    let config_file = target_file(config_path)?;

    // Ensure config file exists
    if !config_file.exists() {
        Config::default().save_to(&config_file)?;
    }

    // Open in default editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    Command::new(&editor)
        .arg(&config_file)
        .status()
        .with_context(|| format!("Failed to launch editor {}", editor))?;

    println!("✓ Configuration saved!");

    Ok(())
}

pub fn init_config(config_path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = target_file(config_path)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(&config_file)?;

    println!("✓ Configuration initialized at: {}", config_file.display());
    println!();
    println!("You can edit it with: fit-coach config edit");

    Ok(())
}
