//! Animation tuning and page selectors
//!
//! Every constant the animator uses lives here so a page with different
//! markup or pacing can be driven without code changes.

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Animation Timing and Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Animation timing, thresholds and geometry
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Counter increment is `ceil(target / counter_speed)` per tick
    pub counter_speed: u32,
    /// Delay between counter ticks
    pub counter_interval_ms: u64,
    /// Visible fraction of the stats section needed to start counting
    pub counter_threshold: f64,
    /// Root margin for the stats section observer (CSS shorthand)
    pub counter_root_margin: String,

    /// Delay between the skills section becoming visible and the stroke write
    pub skill_delay_ms: u64,
    /// Ring radius in SVG units (circumference = 2 * pi * radius)
    pub skill_radius: f64,
    /// Visible fraction of the skills section needed to start
    pub skill_threshold: f64,
    /// Root margin for the skills section observer
    pub skill_root_margin: String,

    /// Visible fraction of a card needed to reveal it
    pub reveal_threshold: f64,
    /// Root margin for the reveal observer (negative bottom reveals a bit later)
    pub reveal_root_margin: String,
    /// Initial downward shift of hidden cards, px
    pub reveal_offset_px: f64,
    /// CSS transition applied to cards when they are hidden
    pub reveal_transition: String,

    /// Delay after load before the hero content fades in
    pub intro_delay_ms: u64,
    /// Initial downward shift of the hero content, px
    pub intro_offset_px: f64,
    /// CSS transition applied when the hero content fades in
    pub intro_transition: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            counter_speed: 200,
            counter_interval_ms: 20,
            counter_threshold: 0.3,
            counter_root_margin: "0px".to_string(),
            skill_delay_ms: 300,
            skill_radius: 45.0,
            skill_threshold: 0.3,
            skill_root_margin: "0px".to_string(),
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_offset_px: 30.0,
            reveal_transition: "all 0.6s ease".to_string(),
            intro_delay_ms: 300,
            intro_offset_px: 50.0,
            intro_transition: "all 1s ease".to_string(),
        }
    }
}

/// Animation settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileAnimation {
    pub counter_speed: Option<u32>,
    pub counter_interval_ms: Option<u64>,
    pub counter_threshold: Option<f64>,
    pub counter_root_margin: Option<String>,
    pub skill_delay_ms: Option<u64>,
    pub skill_radius: Option<f64>,
    pub skill_threshold: Option<f64>,
    pub skill_root_margin: Option<String>,
    pub reveal_threshold: Option<f64>,
    pub reveal_root_margin: Option<String>,
    pub reveal_offset_px: Option<f64>,
    pub reveal_transition: Option<String>,
    pub intro_delay_ms: Option<u64>,
    pub intro_offset_px: Option<f64>,
    pub intro_transition: Option<String>,
}

impl AnimationConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileAnimation>) -> Self {
        let file = file.unwrap_or_default();
        let d = Self::default();

        Self {
            // A zero speed would divide by zero; one tick to the target instead
            counter_speed: file.counter_speed.unwrap_or(d.counter_speed).max(1),
            // A zero interval would spin the ramp at a single instant
            counter_interval_ms: file
                .counter_interval_ms
                .unwrap_or(d.counter_interval_ms)
                .max(1),
            counter_threshold: file.counter_threshold.unwrap_or(d.counter_threshold),
            counter_root_margin: file.counter_root_margin.unwrap_or(d.counter_root_margin),
            skill_delay_ms: file.skill_delay_ms.unwrap_or(d.skill_delay_ms),
            skill_radius: file.skill_radius.unwrap_or(d.skill_radius),
            skill_threshold: file.skill_threshold.unwrap_or(d.skill_threshold),
            skill_root_margin: file.skill_root_margin.unwrap_or(d.skill_root_margin),
            reveal_threshold: file.reveal_threshold.unwrap_or(d.reveal_threshold),
            reveal_root_margin: file.reveal_root_margin.unwrap_or(d.reveal_root_margin),
            reveal_offset_px: file.reveal_offset_px.unwrap_or(d.reveal_offset_px),
            reveal_transition: file.reveal_transition.unwrap_or(d.reveal_transition),
            intro_delay_ms: file.intro_delay_ms.unwrap_or(d.intro_delay_ms),
            intro_offset_px: file.intro_offset_px.unwrap_or(d.intro_offset_px),
            intro_transition: file.intro_transition.unwrap_or(d.intro_transition),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Selectors
// ─────────────────────────────────────────────────────────────────────────────

/// CSS selectors that locate animated elements in the page
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Container whose visibility starts the counters
    pub stats_section: String,
    /// Counter elements inside the stats section
    pub counter: String,
    /// Container whose visibility starts the skill rings
    pub skills_section: String,
    /// Skill ring elements inside the skills section
    pub skill_circle: String,
    /// Stroked progress element inside each skill ring
    pub skill_progress: String,
    /// Elements revealed individually as they scroll into view
    pub reveal: String,
    /// Content faded in on load
    pub hero: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            stats_section: ".stats-section".to_string(),
            counter: ".counter".to_string(),
            skills_section: ".skills-section".to_string(),
            skill_circle: ".skill-circle".to_string(),
            skill_progress: ".skill-progress".to_string(),
            reveal: ".service-card, .team-card, .blog-card, .choose-item, .project-card, .contact-item"
                .to_string(),
            hero: ".hero-content".to_string(),
        }
    }
}

/// Selectors as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileSelectors {
    pub stats_section: Option<String>,
    pub counter: Option<String>,
    pub skills_section: Option<String>,
    pub skill_circle: Option<String>,
    pub skill_progress: Option<String>,
    pub reveal: Option<String>,
    pub hero: Option<String>,
}

impl SelectorConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileSelectors>) -> Self {
        let file = file.unwrap_or_default();
        let d = Self::default();

        Self {
            stats_section: file.stats_section.unwrap_or(d.stats_section),
            counter: file.counter.unwrap_or(d.counter),
            skills_section: file.skills_section.unwrap_or(d.skills_section),
            skill_circle: file.skill_circle.unwrap_or(d.skill_circle),
            skill_progress: file.skill_progress.unwrap_or(d.skill_progress),
            reveal: file.reveal.unwrap_or(d.reveal),
            hero: file.hero.unwrap_or(d.hero),
        }
    }
}
