// Startup module - banner and feature status
//
// Printed once before playback:
// - version and the page being played
// - where configuration came from
// - which animation features are on

use crate::config::{Config, Features, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Feature status for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

/// What is about to be played
pub struct PlaybackInfo<'a> {
    pub title: &'a str,
    pub elements: usize,
    pub scroll_steps: usize,
    pub speed: f64,
    pub storage: bool,
}

pub fn print_startup(config: &Config, info: &PlaybackInfo<'_>) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}sitefx{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Headless scroll-animation simulator{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    println!("  {DIM}Features...{RESET}");
    for module in &module_status(config, info.storage) {
        print_module_status(module);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Playing {BOLD}{}{RESET} {DIM}({} elements, {} scroll steps){RESET}",
        info.title, info.elements, info.scroll_steps
    );
    println!("  {MAGENTA}▸{RESET} {}", speed_label(info.speed));
    println!();
}

fn speed_label(speed: f64) -> String {
    if speed > 0.0 {
        format!("Playback speed {}x", speed)
    } else {
        "Playback as fast as possible".to_string()
    }
}

fn module_status(config: &Config, storage: bool) -> Vec<ModuleStatus> {
    let Features {
        counters,
        skills,
        reveal,
        intro,
        json_logging,
    } = &config.features;

    vec![
        ModuleStatus {
            name: "counters",
            enabled: *counters,
            description: "Stats ramp on view",
        },
        ModuleStatus {
            name: "skills",
            enabled: *skills,
            description: "Skill rings on view",
        },
        ModuleStatus {
            name: "reveal",
            enabled: *reveal,
            description: "Card fade-in on scroll",
        },
        ModuleStatus {
            name: "intro",
            enabled: *intro,
            description: "Hero fade-in on load",
        },
        ModuleStatus {
            name: "storage",
            enabled: *json_logging && storage,
            description: "JSONL event log",
        },
    ]
}

fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Same status, through tracing (ends up in the log file when enabled)
pub fn log_startup(config: &Config, info: &PlaybackInfo<'_>) {
    tracing::info!("sitefx v{} playing {:?}", VERSION, info.title);
    for module in &module_status(config, info.storage) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }
    tracing::info!("{}", speed_label(info.speed));
}
