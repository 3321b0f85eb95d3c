// Events that flow from the page session to the printer and storage tasks
//
// Every observable thing the animator does to the page (text writes, inline
// style writes) and every decision it makes (start, skip, finish) becomes a
// PageEvent. The animator itself never prints; consumers decide what to do
// with the stream.

use crate::animator::TriggerKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Main event type that flows through the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")] // {"type": "text_changed", ...}
pub enum PageEvent {
    /// The viewport moved
    Scrolled { at_ms: u64, scroll_y: f64 },

    /// An observer was set up for a group of targets
    ObserverAttached {
        at_ms: u64,
        kind: TriggerKind,
        targets: usize,
        threshold: f64,
        root_margin: String,
    },

    /// A feature's container is not on this page; nothing was attached
    FeatureAbsent {
        at_ms: u64,
        kind: TriggerKind,
        selector: String,
    },

    /// An observer delivered a visibility record
    Intersection {
        at_ms: u64,
        kind: TriggerKind,
        element: String,
        ratio: f64,
        is_intersecting: bool,
    },

    /// A one-shot animation began for a target
    AnimationStarted {
        at_ms: u64,
        kind: TriggerKind,
        element: String,
    },

    /// Text content was replaced
    TextChanged {
        at_ms: u64,
        element: String,
        text: String,
    },

    /// An inline style property was written
    StyleChanged {
        at_ms: u64,
        element: String,
        property: String,
        value: String,
    },

    /// Malformed or incomplete markup; the element stays as it is
    AnimationSkipped {
        at_ms: u64,
        kind: TriggerKind,
        element: String,
        reason: String,
    },

    /// All work for a target is done
    AnimationFinished {
        at_ms: u64,
        kind: TriggerKind,
        element: String,
    },
}

impl PageEvent {
    /// Virtual page time the event happened at
    pub fn at_ms(&self) -> u64 {
        match self {
            PageEvent::Scrolled { at_ms, .. }
            | PageEvent::ObserverAttached { at_ms, .. }
            | PageEvent::FeatureAbsent { at_ms, .. }
            | PageEvent::Intersection { at_ms, .. }
            | PageEvent::AnimationStarted { at_ms, .. }
            | PageEvent::TextChanged { at_ms, .. }
            | PageEvent::StyleChanged { at_ms, .. }
            | PageEvent::AnimationSkipped { at_ms, .. }
            | PageEvent::AnimationFinished { at_ms, .. } => *at_ms,
        }
    }

    /// One-line human readable form for headless output
    pub fn describe(&self) -> String {
        match self {
            PageEvent::Scrolled { scroll_y, .. } => format!("scroll to y={}", scroll_y),
            PageEvent::ObserverAttached {
                kind,
                targets,
                threshold,
                root_margin,
                ..
            } => format!(
                "observing {} {} target(s) (threshold {}, margin {})",
                targets, kind, threshold, root_margin
            ),
            PageEvent::FeatureAbsent { kind, selector, .. } => {
                format!("{} skipped: no element matches {}", kind, selector)
            }
            PageEvent::Intersection {
                kind,
                element,
                ratio,
                is_intersecting,
                ..
            } => format!(
                "{} {} {} ({:.0}% visible)",
                kind,
                element,
                if *is_intersecting { "entered" } else { "left" },
                ratio * 100.0
            ),
            PageEvent::AnimationStarted { kind, element, .. } => {
                format!("{} start {}", kind, element)
            }
            PageEvent::TextChanged { element, text, .. } => format!("{} = {:?}", element, text),
            PageEvent::StyleChanged {
                element,
                property,
                value,
                ..
            } => format!("{} {{ {}: {} }}", element, property, value),
            PageEvent::AnimationSkipped {
                kind,
                element,
                reason,
                ..
            } => format!("{} skip {}: {}", kind, element, reason),
            PageEvent::AnimationFinished { kind, element, .. } => {
                format!("{} done {}", kind, element)
            }
        }
    }
}

/// A PageEvent stamped with wall-clock time and the run it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct TrackedEvent {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(flatten)]
    pub event: PageEvent,
}

impl TrackedEvent {
    pub fn new(event: PageEvent, session_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id.into(),
            event,
        }
    }
}

/// Summary statistics for the end-of-run report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub scroll_steps: usize,
    pub intersections: usize,
    pub counters_started: usize,
    pub skills_started: usize,
    pub reveals_started: usize,
    pub intros_started: usize,
    pub finished: usize,
    pub skipped: usize,
    pub text_writes: usize,
    pub style_writes: usize,
}

impl Stats {
    pub fn record(&mut self, event: &PageEvent) {
        match event {
            PageEvent::Scrolled { .. } => self.scroll_steps += 1,
            PageEvent::Intersection { .. } => self.intersections += 1,
            PageEvent::AnimationStarted { kind, .. } => match kind {
                TriggerKind::Counter => self.counters_started += 1,
                TriggerKind::SkillCircle => self.skills_started += 1,
                TriggerKind::Reveal => self.reveals_started += 1,
                TriggerKind::Intro => self.intros_started += 1,
            },
            PageEvent::TextChanged { .. } => self.text_writes += 1,
            PageEvent::StyleChanged { .. } => self.style_writes += 1,
            PageEvent::AnimationSkipped { .. } => self.skipped += 1,
            PageEvent::AnimationFinished { .. } => self.finished += 1,
            PageEvent::ObserverAttached { .. } | PageEvent::FeatureAbsent { .. } => {}
        }
    }

    pub fn animations_started(&self) -> usize {
        self.counters_started + self.skills_started + self.reveals_started + self.intros_started
    }

    pub fn summary(&self) -> String {
        format!(
            "{} animation(s) started ({} counter, {} skill, {} reveal, {} intro), \
             {} finished, {} skipped; {} text / {} style write(s) over {} scroll step(s)",
            self.animations_started(),
            self.counters_started,
            self.skills_started,
            self.reveals_started,
            self.intros_started,
            self.finished,
            self.skipped,
            self.text_writes,
            self.style_writes,
            self.scroll_steps,
        )
    }
}
