// Animator - one-shot animations triggered by visibility
//
// The animator binds page elements to animations:
// - counter:      stats section visible  -> ramp every counter to its data-target
// - skill circle: skills section visible -> draw each ring to its data-percent
// - reveal:       card visible           -> fade the card in and slide it up
// - intro:        page loaded            -> fade the hero content in (time based)
//
// Each binding carries an explicit {Pending, Done} state. The first qualifying
// visibility record flips it to Done and starts the animation; every later
// record for that binding is ignored, so an animation runs at most once per
// page lifetime.
//
// The animator does no I/O and owns no clock. Observers deliver visibility
// records, a Scheduler holds deferred work (`Task`s), and every mutation is
// reported back to the caller as a `PageEvent`.

pub mod counter;
pub mod reveal;
pub mod skill;

use crate::config::{AnimationConfig, Config, Features, SelectorConfig};
use crate::dom::{Document, ElementId, Selector};
use crate::events::PageEvent;
use crate::observer::{
    IntersectionEntry, ObserverOptions, RootMargin, Viewport, ViewportObserver, VisibilityObserver,
};
use crate::scheduler::Scheduler;
use anyhow::{Context, Result};
use reveal::StyleSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// What a binding does once triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Counter,
    SkillCircle,
    Reveal,
    Intro,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerKind::Counter => "counter",
            TriggerKind::SkillCircle => "skill-circle",
            TriggerKind::Reveal => "reveal",
            TriggerKind::Intro => "intro",
        })
    }
}

/// One-shot completion flag. Set to `Done` exactly once, never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Done,
}

/// Index of a binding inside its animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

/// Deferred work placed on the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance every still-ramping counter of a binding by one step
    CounterTick(BindingId),
    /// Write stroke offsets for every ring of a binding
    SkillStroke(BindingId),
    /// Fade in the hero content
    IntroReveal(BindingId),
}

#[derive(Debug, Clone)]
struct Member {
    element: ElementId,
    done: bool,
}

/// An observed element and the animation it triggers
#[derive(Debug, Clone)]
pub struct Binding {
    pub kind: TriggerKind,
    pub target: ElementId,
    pub state: TargetState,
    /// Elements the animation writes to (the target itself for reveal/intro)
    members: Vec<Member>,
}

impl Binding {
    #[cfg(test)]
    pub fn members(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.members.iter().map(|m| m.element)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Validated, ready-to-use animator settings
#[derive(Debug, Clone)]
pub struct AnimatorSettings {
    pub features: Features,

    pub stats_section: Selector,
    pub counter: Selector,
    pub counter_options: ObserverOptions,
    pub counter_speed: u32,
    pub counter_interval: Duration,

    pub skills_section: Selector,
    pub skill_circle: Selector,
    pub skill_progress: Selector,
    pub skill_options: ObserverOptions,
    pub skill_delay: Duration,
    pub skill_circumference: f64,

    pub reveal: Selector,
    pub reveal_options: ObserverOptions,
    pub reveal_offset_px: f64,
    pub reveal_transition: String,

    pub hero: Selector,
    pub intro_delay: Duration,
    pub intro_offset_px: f64,
    pub intro_transition: String,
}

impl AnimatorSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.animation, &config.selectors, &config.features)
    }

    /// Parse selectors and margins. Invalid values are configuration errors.
    pub fn new(
        animation: &AnimationConfig,
        selectors: &SelectorConfig,
        features: &Features,
    ) -> Result<Self> {
        let selector = |name: &str, value: &str| {
            Selector::parse(value).with_context(|| format!("Invalid selector for {}", name))
        };
        let options = |name: &str, threshold: f64, margin: &str| -> Result<ObserverOptions> {
            let margin: RootMargin = margin
                .parse()
                .with_context(|| format!("Invalid root margin for {}", name))?;
            Ok(ObserverOptions::new(threshold, margin))
        };

        Ok(Self {
            features: features.clone(),

            stats_section: selector("stats_section", &selectors.stats_section)?,
            counter: selector("counter", &selectors.counter)?,
            counter_options: options(
                "counters",
                animation.counter_threshold,
                &animation.counter_root_margin,
            )?,
            counter_speed: animation.counter_speed,
            counter_interval: Duration::from_millis(animation.counter_interval_ms.max(1)),

            skills_section: selector("skills_section", &selectors.skills_section)?,
            skill_circle: selector("skill_circle", &selectors.skill_circle)?,
            skill_progress: selector("skill_progress", &selectors.skill_progress)?,
            skill_options: options(
                "skills",
                animation.skill_threshold,
                &animation.skill_root_margin,
            )?,
            skill_delay: Duration::from_millis(animation.skill_delay_ms),
            skill_circumference: skill::circumference(animation.skill_radius),

            reveal: selector("reveal", &selectors.reveal)?,
            reveal_options: options(
                "reveal",
                animation.reveal_threshold,
                &animation.reveal_root_margin,
            )?,
            reveal_offset_px: animation.reveal_offset_px,
            reveal_transition: animation.reveal_transition.clone(),

            hero: selector("hero", &selectors.hero)?,
            intro_delay: Duration::from_millis(animation.intro_delay_ms),
            intro_offset_px: animation.intro_offset_px,
            intro_transition: animation.intro_transition.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animator
// ─────────────────────────────────────────────────────────────────────────────

/// Container selector, member selector and observer settings of a section
struct SectionSpec {
    kind: TriggerKind,
    container: Selector,
    members: Selector,
    options: ObserverOptions,
}

struct Group<O> {
    kind: TriggerKind,
    observer: O,
}

/// Visibility-triggered one-shot animator
pub struct Animator<O = ViewportObserver> {
    settings: AnimatorSettings,
    attached: bool,
    groups: Vec<Group<O>>,
    bindings: Vec<Binding>,
    by_target: HashMap<(TriggerKind, ElementId), BindingId>,
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

impl<O: VisibilityObserver> Animator<O> {
    pub fn new(settings: AnimatorSettings) -> Self {
        Self {
            settings,
            attached: false,
            groups: Vec::new(),
            bindings: Vec::new(),
            by_target: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[cfg(test)]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    #[cfg(test)]
    /// Binding triggered by `target`, if any
    pub fn binding_for(&self, kind: TriggerKind, target: ElementId) -> Option<&Binding> {
        self.by_target
            .get(&(kind, target))
            .map(|id| &self.bindings[id.0])
    }

    /// Observer used for a trigger kind (absent when nothing was attached)
    pub fn observer(&self, kind: TriggerKind) -> Option<&O> {
        self.groups
            .iter()
            .find(|g| g.kind == kind)
            .map(|g| &g.observer)
    }

    fn add_binding(&mut self, kind: TriggerKind, target: ElementId, members: Vec<ElementId>) {
        let id = BindingId(self.bindings.len());
        self.bindings.push(Binding {
            kind,
            target,
            state: TargetState::Pending,
            members: members
                .into_iter()
                .map(|element| Member {
                    element,
                    done: false,
                })
                .collect(),
        });
        self.by_target.insert((kind, target), id);
    }

    /// Find animated elements, prepare them and start observing.
    ///
    /// Attaching is one-time: calling it again on the same animator does
    /// nothing, so timers are never scheduled twice for the same page.
    pub fn attach(
        &mut self,
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
    ) -> Vec<PageEvent> {
        let mut events = Vec::new();
        if self.attached {
            tracing::warn!("Animator already attached; ignoring repeated attach");
            return events;
        }
        self.attached = true;
        let at_ms = millis(scheduler.now());

        if self.settings.features.counters {
            let section = SectionSpec {
                kind: TriggerKind::Counter,
                container: self.settings.stats_section.clone(),
                members: self.settings.counter.clone(),
                options: self.settings.counter_options.clone(),
            };
            self.attach_section(doc, section, at_ms, &mut events);
        }

        if self.settings.features.skills {
            let section = SectionSpec {
                kind: TriggerKind::SkillCircle,
                container: self.settings.skills_section.clone(),
                members: self.settings.skill_circle.clone(),
                options: self.settings.skill_options.clone(),
            };
            self.attach_section(doc, section, at_ms, &mut events);
        }

        if self.settings.features.reveal {
            self.attach_reveal(doc, at_ms, &mut events);
        }

        if self.settings.features.intro {
            self.start_intro(doc, scheduler, at_ms, &mut events);
        }

        events
    }

    /// Counter and skill groups: one container observed, its members animated
    fn attach_section(
        &mut self,
        doc: &Document,
        section: SectionSpec,
        at_ms: u64,
        events: &mut Vec<PageEvent>,
    ) {
        let SectionSpec {
            kind,
            container,
            members,
            options,
        } = section;

        // No container on this page: the feature is simply not present
        let Some(section) = doc.query_selector(&container) else {
            tracing::debug!("No {} container ({}); not observing", kind, container);
            events.push(PageEvent::FeatureAbsent {
                at_ms,
                kind,
                selector: container.to_string(),
            });
            return;
        };

        let found = doc.query_within(section, &members);
        tracing::info!(
            "Observing {} with {} {} element(s)",
            doc.label(section),
            found.len(),
            kind
        );

        let mut observer = O::with_options(options.clone());
        observer.observe(section);
        self.groups.push(Group { kind, observer });
        self.add_binding(kind, section, found);

        events.push(PageEvent::ObserverAttached {
            at_ms,
            kind,
            targets: 1,
            threshold: options.threshold,
            root_margin: options.root_margin.to_string(),
        });
    }

    fn attach_reveal(&mut self, doc: &mut Document, at_ms: u64, events: &mut Vec<PageEvent>) {
        let targets = doc.query_selector_all(&self.settings.reveal);
        if targets.is_empty() {
            tracing::debug!("No reveal targets ({})", self.settings.reveal);
            events.push(PageEvent::FeatureAbsent {
                at_ms,
                kind: TriggerKind::Reveal,
                selector: self.settings.reveal.to_string(),
            });
            return;
        }

        let options = self.settings.reveal_options.clone();
        let mut observer = O::with_options(options.clone());
        let hidden = reveal::hidden(
            self.settings.reveal_offset_px,
            Some(self.settings.reveal_transition.as_str()),
        );
        for &target in &targets {
            apply_styles(doc, target, &hidden, at_ms, events);
            observer.observe(target);
            self.add_binding(TriggerKind::Reveal, target, vec![target]);
        }
        self.groups.push(Group {
            kind: TriggerKind::Reveal,
            observer,
        });

        tracing::info!("Observing {} reveal target(s)", targets.len());
        events.push(PageEvent::ObserverAttached {
            at_ms,
            kind: TriggerKind::Reveal,
            targets: targets.len(),
            threshold: options.threshold,
            root_margin: options.root_margin.to_string(),
        });
    }

    fn start_intro(
        &mut self,
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
        at_ms: u64,
        events: &mut Vec<PageEvent>,
    ) {
        let Some(hero) = doc.query_selector(&self.settings.hero) else {
            events.push(PageEvent::FeatureAbsent {
                at_ms,
                kind: TriggerKind::Intro,
                selector: self.settings.hero.to_string(),
            });
            return;
        };

        let id = BindingId(self.bindings.len());
        self.add_binding(TriggerKind::Intro, hero, vec![hero]);
        self.bindings[id.0].state = TargetState::Done;

        let label = doc.label(hero);
        events.push(PageEvent::AnimationStarted {
            at_ms,
            kind: TriggerKind::Intro,
            element: label,
        });
        let hidden = reveal::hidden(self.settings.intro_offset_px, None);
        apply_styles(doc, hero, &hidden, at_ms, events);
        scheduler.schedule(self.settings.intro_delay, Task::IntroReveal(id));
    }

    /// Poll every observer and act on the records it delivers
    pub fn poll(
        &mut self,
        doc: &mut Document,
        viewport: &Viewport,
        scheduler: &mut impl Scheduler<Task>,
    ) -> Vec<PageEvent> {
        let batches: Vec<(TriggerKind, Vec<IntersectionEntry>)> = self
            .groups
            .iter_mut()
            .map(|g| (g.kind, g.observer.take_records(&*doc, viewport)))
            .collect();

        let mut events = Vec::new();
        for (kind, entries) in batches {
            events.extend(self.handle_entries(kind, &entries, doc, scheduler));
        }
        events
    }

    /// Act on visibility records delivered for a trigger kind.
    ///
    /// A record starts the bound animation only if the binding is still
    /// pending and the record meets the observer's threshold.
    pub fn handle_entries(
        &mut self,
        kind: TriggerKind,
        entries: &[IntersectionEntry],
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
    ) -> Vec<PageEvent> {
        let mut events = Vec::new();
        let Some(options) = self.observer(kind).map(|o| o.options().clone()) else {
            return events;
        };
        let at_ms = millis(scheduler.now());

        for entry in entries {
            let Some(&id) = self.by_target.get(&(kind, entry.target)) else {
                continue;
            };
            events.push(PageEvent::Intersection {
                at_ms,
                kind,
                element: doc.label(entry.target),
                ratio: entry.ratio,
                is_intersecting: entry.is_intersecting,
            });

            if self.bindings[id.0].state == TargetState::Done {
                tracing::trace!("{} already animated", doc.label(entry.target));
                continue;
            }
            if !options.qualifies(entry) {
                continue;
            }

            self.bindings[id.0].state = TargetState::Done;
            self.start(id, doc, scheduler, &mut events);
        }
        events
    }

    fn start(
        &mut self,
        id: BindingId,
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
        events: &mut Vec<PageEvent>,
    ) {
        let at_ms = millis(scheduler.now());
        let binding = &self.bindings[id.0];
        let (kind, target) = (binding.kind, binding.target);
        let label = doc.label(target);
        tracing::debug!("Starting {} animation on {}", kind, label);
        events.push(PageEvent::AnimationStarted {
            at_ms,
            kind,
            element: label.clone(),
        });

        match kind {
            // First step runs right away, the rest on the timer
            TriggerKind::Counter => self.counter_tick(id, doc, scheduler, events),
            TriggerKind::SkillCircle => {
                scheduler.schedule(self.settings.skill_delay, Task::SkillStroke(id));
            }
            TriggerKind::Reveal => {
                apply_styles(doc, target, &reveal::shown(None), at_ms, events);
                events.push(PageEvent::AnimationFinished {
                    at_ms,
                    kind,
                    element: label,
                });
            }
            // Started on attach, never by visibility
            TriggerKind::Intro => {}
        }
    }

    /// Run a task the scheduler handed back
    pub fn run_task(
        &mut self,
        task: Task,
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
    ) -> Vec<PageEvent> {
        let mut events = Vec::new();
        match task {
            Task::CounterTick(id) => self.counter_tick(id, doc, scheduler, &mut events),
            Task::SkillStroke(id) => self.skill_stroke(id, doc, scheduler.now(), &mut events),
            Task::IntroReveal(id) => self.intro_reveal(id, doc, scheduler.now(), &mut events),
        }
        events
    }

    /// One ramp step for every counter still below its target.
    /// Reschedules itself once per tick while any counter is ramping.
    fn counter_tick(
        &mut self,
        id: BindingId,
        doc: &mut Document,
        scheduler: &mut impl Scheduler<Task>,
        events: &mut Vec<PageEvent>,
    ) {
        let at_ms = millis(scheduler.now());
        let speed = self.settings.counter_speed;
        let interval = self.settings.counter_interval;
        let binding = &mut self.bindings[id.0];
        let mut ramping = false;

        for member in binding.members.iter_mut().filter(|m| !m.done) {
            let el = member.element;
            let Some(target) = counter::parse_target(doc.attribute(el, "data-target")) else {
                member.done = true;
                let label = doc.label(el);
                tracing::warn!("{} has no usable data-target; leaving it as is", label);
                events.push(PageEvent::AnimationSkipped {
                    at_ms,
                    kind: TriggerKind::Counter,
                    element: label,
                    reason: "missing or non-numeric data-target".to_string(),
                });
                continue;
            };

            let step = counter::step(counter::parse_display(doc.text(el)), target, speed);
            let text = step.value().to_string();
            if doc.set_text(el, &text) {
                events.push(PageEvent::TextChanged {
                    at_ms,
                    element: doc.label(el),
                    text,
                });
            }
            if step.is_settled() {
                member.done = true;
            } else {
                ramping = true;
            }
        }

        if ramping {
            scheduler.schedule(interval, Task::CounterTick(id));
        } else {
            let label = doc.label(binding.target);
            tracing::debug!("Counters in {} settled", label);
            events.push(PageEvent::AnimationFinished {
                at_ms,
                kind: TriggerKind::Counter,
                element: label,
            });
        }
    }

    fn skill_stroke(
        &mut self,
        id: BindingId,
        doc: &mut Document,
        now: Duration,
        events: &mut Vec<PageEvent>,
    ) {
        let at_ms = millis(now);
        let circumference = self.settings.skill_circumference;
        let progress_sel = self.settings.skill_progress.clone();
        let binding = &mut self.bindings[id.0];

        for member in binding.members.iter_mut().filter(|m| !m.done) {
            member.done = true;
            let el = member.element;
            let skip = |reason: &str, events: &mut Vec<PageEvent>| {
                let label = doc.label(el);
                tracing::warn!("{}: {}; leaving it as is", label, reason);
                events.push(PageEvent::AnimationSkipped {
                    at_ms,
                    kind: TriggerKind::SkillCircle,
                    element: label,
                    reason: reason.to_string(),
                });
            };

            let Some(percent) = skill::parse_percent(doc.attribute(el, "data-percent")) else {
                skip("missing or non-numeric data-percent", events);
                continue;
            };
            let Some(&progress) = doc.query_within(el, &progress_sel).first() else {
                skip("no progress element", events);
                continue;
            };

            let offset = skill::format_offset(skill::dash_offset(percent, circumference));
            let styles: StyleSet = vec![("stroke-dashoffset", offset)];
            apply_styles(doc, progress, &styles, at_ms, events);
        }

        events.push(PageEvent::AnimationFinished {
            at_ms,
            kind: TriggerKind::SkillCircle,
            element: doc.label(binding.target),
        });
    }

    fn intro_reveal(
        &mut self,
        id: BindingId,
        doc: &mut Document,
        now: Duration,
        events: &mut Vec<PageEvent>,
    ) {
        let at_ms = millis(now);
        let binding = &mut self.bindings[id.0];
        let hero = binding.target;
        for member in &mut binding.members {
            member.done = true;
        }

        let shown = reveal::shown(Some(self.settings.intro_transition.as_str()));
        apply_styles(doc, hero, &shown, at_ms, events);
        events.push(PageEvent::AnimationFinished {
            at_ms,
            kind: TriggerKind::Intro,
            element: doc.label(hero),
        });
    }
}

/// Write styles, reporting only the ones that changed something
fn apply_styles(
    doc: &mut Document,
    el: ElementId,
    styles: &StyleSet,
    at_ms: u64,
    events: &mut Vec<PageEvent>,
) {
    for (property, value) in styles {
        if doc.set_style(el, property, value) {
            events.push(PageEvent::StyleChanged {
                at_ms,
                element: doc.label(el),
                property: property.to_string(),
                value: value.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests;
