//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show`, `config get`, `config set` and
//! `config path` for creating, viewing and modifying the configuration file.

use std::path::Path;

use clap::Subcommand;
use orthotile::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;
use crate::runner::GlobalArgs;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., cache.max_size)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., cache.max_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(global: &GlobalArgs, command: ConfigCommands) -> Result<(), CliError> {
    let path = global.config_path.clone().unwrap_or_else(config_file_path);
    match command {
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Get { key } => run_get(global, &key),
        ConfigCommands::Set { key, value } => run_set(global, &path, &key, &value),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Write the default configuration.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(path)?;
    println!("Configuration file: {}", path.display());
    println!();
    println!("Add scenery roots with 'orthotile config set scenery.paths <dir;dir>'.");
    Ok(())
}

/// Print every setting, grouped by section.
fn run_show(global: &GlobalArgs) -> Result<(), CliError> {
    let config = global.load_config()?;

    let mut current_section = "";
    for key in ConfigKey::all() {
        let section = key.section();

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    if !global.scenery.is_empty() {
        println!();
        println!("Command-line scenery (searched first):");
        for path in &global.scenery {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

/// Get a configuration value.
fn run_get(global: &GlobalArgs, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let value = config_key.get(&global.load_config()?);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value.
fn run_set(global: &GlobalArgs, path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = global.load_config()?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key, config_key.get(&config));
    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'orthotile config show' to see available keys.",
            key
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn global(dir: &TempDir) -> GlobalArgs {
        GlobalArgs {
            config_path: Some(dir.path().join("config.ini")),
            scenery: Vec::new(),
        }
    }

    #[test]
    fn test_init_then_set() {
        let dir = TempDir::new().unwrap();
        let global = global(&dir);

        run(&global, ConfigCommands::Init { force: false }).unwrap();
        assert!(run(&global, ConfigCommands::Init { force: false }).is_err());

        run(
            &global,
            ConfigCommands::Set {
                key: "cache.max_size".to_string(),
                value: "128MB".to_string(),
            },
        )
        .unwrap();

        let config = global.load_config().unwrap();
        assert_eq!(config.cache.max_size, 128 * 1024 * 1024);
    }

    #[test]
    fn test_unknown_key() {
        let dir = TempDir::new().unwrap();
        let err = run(
            &global(&dir),
            ConfigCommands::Get {
                key: "nope.nothing".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("nope.nothing"));
    }
}
