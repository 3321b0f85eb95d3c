//! Configuration for the page simulator
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/sitefx/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod animation;
mod features;
mod observability;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use animation::{AnimationConfig, FileAnimation, FileSelectors, SelectorConfig};
pub use features::{Features, FileFeatures};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default viewport height in CSS pixels (a typical laptop window)
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Slowest accepted playback speed; anything in (0, this) is rejected
pub const MIN_PLAYBACK_SPEED: f64 = 1e-3;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory for JSONL event logs
    pub log_dir: PathBuf,

    /// Timeline pacing: 1.0 = real time, 2.0 = twice as fast, 0 = no waiting
    pub playback_speed: f64,

    /// Viewport height used when a page manifest does not set its own
    pub viewport_height: f64,

    /// Feature flags for optional behaviors
    pub features: Features,

    /// Timing, thresholds and geometry
    pub animation: AnimationConfig,

    /// Where animated elements are found in the page
    pub selectors: SelectorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            playback_speed: 1.0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            features: Features::default(),
            animation: AnimationConfig::default(),
            selectors: SelectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub log_dir: Option<String>,
    pub playback_speed: Option<f64>,
    pub viewport_height: Option<f64>,

    /// Optional [features] section
    pub features: Option<FileFeatures>,

    /// Optional [animation] section
    pub animation: Option<FileAnimation>,

    /// Optional [selectors] section
    pub selectors: Option<FileSelectors>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

/// Accept only finite, non-negative numbers
fn non_negative(v: f64) -> Option<f64> {
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// Accept 0 (no waiting) or a finite speed of at least `MIN_PLAYBACK_SPEED`
pub fn playback_speed(v: f64) -> Option<f64> {
    non_negative(v).filter(|&v| v == 0.0 || v >= MIN_PLAYBACK_SPEED)
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/sitefx/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("sitefx").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// # Panics
    /// Exits the process if the config file exists but cannot be parsed.
    /// A broken config should fail fast with a clear error, not silently
    /// fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Numbers where strings are expected (e.g. root margins)");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `sitefx config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Log directory: env > file > default
        let log_dir = env("SITEFX_LOG_DIR")
            .or(file.log_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        // Playback speed: env > file > default (invalid values are ignored)
        let playback_speed = env("SITEFX_PLAYBACK_SPEED")
            .and_then(|v| v.parse().ok())
            .and_then(playback_speed)
            .or(file.playback_speed.and_then(playback_speed))
            .unwrap_or(defaults.playback_speed);

        // Viewport height: env > file > default
        let viewport_height = env("SITEFX_VIEWPORT_HEIGHT")
            .and_then(|v| v.parse().ok())
            .and_then(non_negative)
            .or(file.viewport_height.and_then(non_negative))
            .unwrap_or(defaults.viewport_height);

        Self {
            log_dir,
            playback_speed,
            viewport_height,
            features: Features::from_file(file.features),
            animation: AnimationConfig::from_file(file.animation),
            selectors: SelectorConfig::from_file(file.selectors),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
