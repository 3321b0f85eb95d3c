//! `[logging]` section: diagnostic output of sitefx itself
//!
//! Page events go to the JSONL run log instead (`Features::json_logging`).
//! This section only controls tracing output: the stdout filter and an
//! optional rolling JSON file next to it.

use serde::Deserialize;
use std::path::PathBuf;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// When the tracing file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Case-insensitive; `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        [Self::Hourly, Self::Daily, Self::Never]
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error; applies to sitefx's own targets
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File names are `<prefix>.<date>` (or just `<prefix>` with `never`)
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs/trace"),
            file_rotation: LogRotation::Daily,
            file_prefix: "sitefx".to_string(),
        }
    }
}

/// `[logging]` as written in the file; every key optional
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

/// Lowercased level if it is one tracing knows
fn known_level(level: &str) -> Option<String> {
    let level = level.trim().to_ascii_lowercase();
    LEVELS.contains(&level.as_str()).then_some(level)
}

impl LoggingConfig {
    /// Unknown levels and rotations fall back to the defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file
                .level
                .as_deref()
                .and_then(known_level)
                .unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map_or(defaults.file_dir, PathBuf::from),
            file_rotation: file
                .file_rotation
                .as_deref()
                .and_then(LogRotation::parse)
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}
