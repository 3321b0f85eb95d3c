//! Feature flags configuration
//!
//! Feature flags for optional behaviors (opt-out: default enabled).

use serde::Deserialize;

/// Feature flags for optional behaviors (opt-out: default enabled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    /// Counter ramps in the stats section
    pub counters: bool,

    /// Circular skill meters in the skills section
    pub skills: bool,

    /// Fade-and-slide reveal of cards as they scroll into view
    pub reveal: bool,

    /// Hero content intro on page load
    pub intro: bool,

    /// Storage module: write events to JSONL files
    pub json_logging: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            counters: true,
            skills: true,
            reveal: true,
            intro: true,
            json_logging: true,
        }
    }
}

/// Feature flags as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeatures {
    pub counters: Option<bool>,
    pub skills: Option<bool>,
    pub reveal: Option<bool>,
    pub intro: Option<bool>,
    pub storage: Option<bool>,
}

impl Features {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileFeatures>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            counters: file.counters.unwrap_or(true),
            skills: file.skills.unwrap_or(true),
            reveal: file.reveal.unwrap_or(true),
            intro: file.intro.unwrap_or(true),
            json_logging: file.storage.unwrap_or(true),
        }
    }
}
