//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        let a = &self.animation;
        let s = &self.selectors;
        format!(
            r#"# sitefx configuration

# Directory for JSONL event logs (one file per run)
log_dir = {log_dir:?}

# Timeline pacing: 1.0 = real time, 2.0 = twice as fast, 0.0 = no waiting
playback_speed = {playback:?}

# Viewport height (px) when the page manifest does not set one
viewport_height = {viewport:?}

# Feature flags
[features]
counters = {counters}
skills = {skills}
reveal = {reveal}
intro = {intro}
storage = {storage}

# ─────────────────────────────────────────────────────────────────────────────
# ANIMATION
# ─────────────────────────────────────────────────────────────────────────────
# Thresholds are the visible fraction (0.0 - 1.0) of the observed element.
# Root margins use CSS shorthand ("0px 0px -50px 0px"); negative values
# shrink the viewport so elements trigger a little later.
[animation]
# Counters step by ceil(target / counter_speed) every counter_interval_ms
counter_speed = {counter_speed}
counter_interval_ms = {counter_interval}
counter_threshold = {counter_threshold:?}
counter_root_margin = {counter_margin:?}

# Skill rings: stroke offset written skill_delay_ms after the section shows
skill_delay_ms = {skill_delay}
skill_radius = {skill_radius:?}
skill_threshold = {skill_threshold:?}
skill_root_margin = {skill_margin:?}

# Cards fade in and slide up as they scroll into view
reveal_threshold = {reveal_threshold:?}
reveal_root_margin = {reveal_margin:?}
reveal_offset_px = {reveal_offset:?}
reveal_transition = {reveal_transition:?}

# Hero content fades in shortly after load
intro_delay_ms = {intro_delay}
intro_offset_px = {intro_offset:?}
intro_transition = {intro_transition:?}

# ─────────────────────────────────────────────────────────────────────────────
# SELECTORS
# ─────────────────────────────────────────────────────────────────────────────
# Supported syntax: tag, #id, .class, compounds (div.card) and comma lists.
[selectors]
stats_section = {stats_section:?}
counter = {counter:?}
skills_section = {skills_section:?}
skill_circle = {skill_circle:?}
skill_progress = {skill_progress:?}
reveal = {reveal_sel:?}
hero = {hero:?}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# File logging (in addition to stdout)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            log_dir = self.log_dir.display().to_string(),
            playback = self.playback_speed,
            viewport = self.viewport_height,
            counters = self.features.counters,
            skills = self.features.skills,
            reveal = self.features.reveal,
            intro = self.features.intro,
            storage = self.features.json_logging,
            counter_speed = a.counter_speed,
            counter_interval = a.counter_interval_ms,
            counter_threshold = a.counter_threshold,
            counter_margin = a.counter_root_margin,
            skill_delay = a.skill_delay_ms,
            skill_radius = a.skill_radius,
            skill_threshold = a.skill_threshold,
            skill_margin = a.skill_root_margin,
            reveal_threshold = a.reveal_threshold,
            reveal_margin = a.reveal_root_margin,
            reveal_offset = a.reveal_offset_px,
            reveal_transition = a.reveal_transition,
            intro_delay = a.intro_delay_ms,
            intro_offset = a.intro_offset_px,
            intro_transition = a.intro_transition,
            stats_section = s.stats_section,
            counter = s.counter,
            skills_section = s.skills_section,
            skill_circle = s.skill_circle,
            skill_progress = s.skill_progress,
            reveal_sel = s.reveal,
            hero = s.hero,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
