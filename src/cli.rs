// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - run <PAGE>: play a page manifest's scroll script
// - demo:       play the built-in landing page (also the default)
// - config:     --show / --reset / --update / --path for the config file

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// sitefx - headless scroll-animation simulator
#[derive(Parser, Debug)]
#[command(name = "sitefx")]
#[command(version = VERSION)]
#[command(about = "Plays scroll scripts against a page and reports its animations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a page manifest (TOML) and its scroll script
    Run {
        /// Path to the page manifest
        page: PathBuf,

        /// Playback speed (1.0 = real time, 0 = no waiting)
        #[arg(long)]
        speed: Option<f64>,

        /// Do not write the JSONL event log
        #[arg(long)]
        no_storage: bool,
    },

    /// Play the built-in demo page
    Demo {
        /// Playback speed (1.0 = real time, 0 = no waiting)
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Update config with new defaults (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Which page to play
#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    Demo,
    Manifest(PathBuf),
}

/// What the simulator should do after argument parsing
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub page: PageSource,
    pub speed: Option<f64>,
    pub storage: bool,
}

impl Cli {
    /// The run requested by these arguments, or `None` for config commands
    pub fn run_request(&self) -> Option<RunRequest> {
        match &self.command {
            Some(Commands::Run {
                page,
                speed,
                no_storage,
            }) => Some(RunRequest {
                page: PageSource::Manifest(page.clone()),
                speed: *speed,
                storage: !no_storage,
            }),
            Some(Commands::Demo { speed }) => Some(RunRequest {
                page: PageSource::Demo,
                speed: *speed,
                storage: true,
            }),
            Some(Commands::Config { .. }) => None,
            None => Some(RunRequest {
                page: PageSource::Demo,
                speed: None,
                storage: true,
            }),
        }
    }
}

/// Parse arguments and handle config commands.
/// Returns the run to perform, or `None` if a command was handled (exit after).
pub fn handle_cli() -> Option<RunRequest> {
    let cli = Cli::parse();

    if let Some(Commands::Config {
        show,
        reset,
        update,
        path,
    }) = cli.command
    {
        if path {
            handle_config_path();
        } else if show {
            handle_config_show();
        } else if reset {
            handle_config_reset();
        } else if update {
            handle_config_update();
        } else {
            // No flag provided, show help
            println!("Usage: sitefx config [--show|--reset|--update|--path]");
            println!();
            println!("Options:");
            println!("  --show    Display effective configuration");
            println!("  --reset   Reset config file to defaults");
            println!("  --update  Update config with new defaults (preserves user values)");
            println!("  --path    Show config file path");
        }
        return None;
    }

    cli.run_request()
}

fn config_path_or_exit() -> PathBuf {
    match Config::config_path() {
        Some(path) => path,
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_path() {
    println!("{}", config_path_or_exit().display());
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let path = config_path_or_exit();

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_update() {
    let path = config_path_or_exit();

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    // Regenerate from the effective values so new keys appear with defaults
    let updated = Config::from_env().to_toml();

    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = std::fs::write(&path, updated) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
}
