//! Animator tests
//!
//! Pages are built by hand with absolute geometry; the timeline is driven
//! through a `TimerQueue` so every tick is deterministic.

use super::*;
use crate::dom::ElementSpec;
use crate::scheduler::TimerQueue;

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

struct Page {
    doc: Document,
    stats: ElementId,
    counters: Vec<ElementId>,
    skills: ElementId,
    ring: ElementId,
    progress: ElementId,
    card: ElementId,
    hero: ElementId,
}

/// hero 0-500, stats 1000-1400, skills 2000-2400, one card at 3000-3200
fn page_with_targets(targets: &[&str]) -> Page {
    let mut doc = Document::new();
    let hero = doc.append(
        None,
        ElementSpec::new("div").class("hero-content").rect(0.0, 500.0),
    );

    let stats = doc.append(
        None,
        ElementSpec::new("section")
            .class("stats-section")
            .rect(1000.0, 400.0),
    );
    let counters = targets
        .iter()
        .map(|t| {
            doc.append(
                Some(stats),
                ElementSpec::new("span")
                    .class("counter")
                    .attr("data-target", *t)
                    .text("0")
                    .rect(1100.0, 40.0),
            )
        })
        .collect();

    let skills = doc.append(
        None,
        ElementSpec::new("section")
            .class("skills-section")
            .rect(2000.0, 400.0),
    );
    let ring = doc.append(
        Some(skills),
        ElementSpec::new("div")
            .class("skill-circle")
            .attr("data-percent", "75")
            .rect(2100.0, 120.0),
    );
    let progress = doc.append(
        Some(ring),
        ElementSpec::new("circle")
            .class("skill-progress")
            .rect(2100.0, 120.0),
    );

    let card = doc.append(
        None,
        ElementSpec::new("div")
            .class("service-card")
            .rect(3000.0, 200.0),
    );

    Page {
        doc,
        stats,
        counters,
        skills,
        ring,
        progress,
        card,
        hero,
    }
}

fn page() -> Page {
    page_with_targets(&["250", "35"])
}

fn settings(adjust: impl FnOnce(&mut Config)) -> AnimatorSettings {
    let mut config = Config::default();
    adjust(&mut config);
    AnimatorSettings::from_config(&config).unwrap()
}

fn viewport_at(scroll_y: f64) -> Viewport {
    let mut viewport = Viewport::new(800.0);
    viewport.scroll_y = scroll_y;
    viewport
}

/// Run every task due at or before `until`
fn drain(
    animator: &mut Animator,
    doc: &mut Document,
    queue: &mut TimerQueue<Task>,
    until: Duration,
) -> Vec<PageEvent> {
    let mut events = Vec::new();
    while let Some(task) = queue.pop_due(until) {
        events.extend(animator.run_task(task, doc, queue));
    }
    events
}

fn started(events: &[PageEvent], kind: TriggerKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PageEvent::AnimationStarted { kind: k, .. } if *k == kind))
        .count()
}

fn finished(events: &[PageEvent], kind: TriggerKind) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PageEvent::AnimationFinished { kind: k, .. } if *k == kind))
        .count()
}

/// Observer that reports every observed target as fully visible on every poll
struct AlwaysVisible {
    options: ObserverOptions,
    targets: Vec<ElementId>,
}

impl VisibilityObserver for AlwaysVisible {
    fn with_options(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    fn options(&self) -> &ObserverOptions {
        &self.options
    }

    fn observe(&mut self, target: ElementId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
    }

    fn is_observing(&self, target: ElementId) -> bool {
        self.targets.contains(&target)
    }

    fn take_records(&mut self, _doc: &Document, _viewport: &Viewport) -> Vec<IntersectionEntry> {
        self.targets
            .iter()
            .map(|&target| IntersectionEntry {
                target,
                ratio: 1.0,
                is_intersecting: true,
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Attach
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_attach_observes_present_features() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|_| {}));

    let events = animator.attach(&mut p.doc, &mut queue);

    let attached = events
        .iter()
        .filter(|e| matches!(e, PageEvent::ObserverAttached { .. }))
        .count();
    assert_eq!(attached, 3);
    assert!(animator.is_attached());

    let counter = animator.binding_for(TriggerKind::Counter, p.stats).unwrap();
    assert_eq!(counter.state, TargetState::Pending);
    assert_eq!(counter.members().collect::<Vec<_>>(), p.counters);

    let skill = animator
        .binding_for(TriggerKind::SkillCircle, p.skills)
        .unwrap();
    assert_eq!(skill.members().collect::<Vec<_>>(), vec![p.ring]);

    assert!(animator
        .observer(TriggerKind::Reveal)
        .unwrap()
        .is_observing(p.card));

    // Only the intro is scheduled before anything is seen
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_attach_twice_is_noop() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|_| {}));

    animator.attach(&mut p.doc, &mut queue);
    let bindings = animator.bindings().len();
    let pending = queue.len();

    let events = animator.attach(&mut p.doc, &mut queue);
    assert!(events.is_empty());
    assert_eq!(animator.bindings().len(), bindings);
    assert_eq!(queue.len(), pending);
}

#[test]
fn test_missing_containers_are_safe() {
    let mut doc = Document::new();
    doc.append(None, ElementSpec::new("main").rect(0.0, 3000.0));
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|_| {}));

    let events = animator.attach(&mut doc, &mut queue);
    let absent = events
        .iter()
        .filter(|e| matches!(e, PageEvent::FeatureAbsent { .. }))
        .count();
    assert_eq!(absent, 4);
    assert!(animator.bindings().is_empty());
    assert!(animator.observer(TriggerKind::Counter).is_none());
    assert!(queue.is_empty());

    // Scrolling a page with nothing to animate does nothing
    for y in [0.0, 1000.0, 2200.0] {
        assert!(animator.poll(&mut doc, &viewport_at(y), &mut queue).is_empty());
    }
}

#[test]
fn test_disabled_features_are_not_attached() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| {
        c.features.skills = false;
        c.features.intro = false;
    }));

    animator.attach(&mut p.doc, &mut queue);
    assert!(animator.observer(TriggerKind::SkillCircle).is_none());
    assert!(animator.binding_for(TriggerKind::Intro, p.hero).is_none());
    assert!(queue.is_empty());
    assert_eq!(p.doc.style(p.hero, "opacity"), None);
}

#[test]
fn test_invalid_selector_is_a_config_error() {
    let mut config = Config::default();
    config.selectors.counter = ".counter > span".to_string();
    assert!(AnimatorSettings::from_config(&config).is_err());

    let mut config = Config::default();
    config.animation.reveal_root_margin = "50".to_string();
    assert!(AnimatorSettings::from_config(&config).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Counters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_counters_ramp_to_targets() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let events = animator.poll(&mut p.doc, &viewport_at(800.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Counter), 1);
    // First step is immediate: ceil(250/200) = 2, ceil(35/200) = 1
    assert_eq!(p.doc.text(p.counters[0]), "2");
    assert_eq!(p.doc.text(p.counters[1]), "1");

    let events = drain(&mut animator, &mut p.doc, &mut queue, Duration::from_secs(10));
    assert_eq!(p.doc.text(p.counters[0]), "250");
    assert_eq!(p.doc.text(p.counters[1]), "35");
    assert_eq!(finished(&events, TriggerKind::Counter), 1);
    assert!(queue.is_empty());

    // 125 steps of 2 for the larger counter, the last at 124 * 20ms
    assert_eq!(queue.now(), Duration::from_millis(2480));

    // Displayed values never go past the target
    for event in &events {
        if let PageEvent::TextChanged { text, .. } = event {
            assert!(text.parse::<u64>().unwrap() <= 250);
        }
    }
}

#[test]
fn test_counter_with_bad_target_is_skipped() {
    let mut p = page_with_targets(&["lots", "40"]);
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let mut events = animator.poll(&mut p.doc, &viewport_at(800.0), &mut queue);
    events.extend(drain(&mut animator, &mut p.doc, &mut queue, Duration::from_secs(5)));

    let skipped: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, PageEvent::AnimationSkipped { .. }))
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(p.doc.text(p.counters[0]), "0");
    assert_eq!(p.doc.text(p.counters[1]), "40");
}

#[test]
fn test_negative_target_snaps_below_zero() {
    let mut p = page_with_targets(&["-4"]);
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let mut events = animator.poll(&mut p.doc, &viewport_at(800.0), &mut queue);
    events.extend(drain(&mut animator, &mut p.doc, &mut queue, Duration::from_secs(5)));

    assert_eq!(p.doc.text(p.counters[0]), "-4");
    assert!(!events
        .iter()
        .any(|e| matches!(e, PageEvent::AnimationSkipped { .. })));
    assert_eq!(finished(&events, TriggerKind::Counter), 1);
}

#[test]
fn test_non_numeric_display_snaps_to_target() {
    let mut p = page();
    p.doc.set_text(p.counters[0], "n/a");
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    animator.poll(&mut p.doc, &viewport_at(800.0), &mut queue);
    assert_eq!(p.doc.text(p.counters[0]), "250");
}

#[test]
fn test_below_threshold_does_not_start() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    // Root 240-1040 shows 40px of the 400px stats section: 10% < 30%
    let events = animator.poll(&mut p.doc, &viewport_at(240.0), &mut queue);
    assert!(events
        .iter()
        .any(|e| matches!(e, PageEvent::Intersection { kind: TriggerKind::Counter, .. })));
    assert_eq!(started(&events, TriggerKind::Counter), 0);
    assert_eq!(
        animator.binding_for(TriggerKind::Counter, p.stats).unwrap().state,
        TargetState::Pending
    );
    assert_eq!(p.doc.text(p.counters[0]), "0");
    assert!(queue.is_empty());

    // Scrolling further crosses the threshold
    let events = animator.poll(&mut p.doc, &viewport_at(500.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Counter), 1);
    assert_eq!(
        animator.binding_for(TriggerKind::Counter, p.stats).unwrap().state,
        TargetState::Done
    );
}

#[test]
fn test_repeated_records_start_once() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator<AlwaysVisible> =
        Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let first = animator.poll(&mut p.doc, &viewport_at(0.0), &mut queue);
    assert_eq!(started(&first, TriggerKind::Counter), 1);
    assert_eq!(started(&first, TriggerKind::SkillCircle), 1);
    assert_eq!(started(&first, TriggerKind::Reveal), 1);

    for _ in 0..3 {
        let again = animator.poll(&mut p.doc, &viewport_at(0.0), &mut queue);
        assert_eq!(started(&again, TriggerKind::Counter), 0);
        assert_eq!(started(&again, TriggerKind::SkillCircle), 0);
        assert_eq!(started(&again, TriggerKind::Reveal), 0);
    }

    // One counter timer and one stroke timer, never duplicated
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_records_for_unbound_targets_are_ignored() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let stray = IntersectionEntry {
        target: p.card,
        ratio: 1.0,
        is_intersecting: true,
    };
    let events = animator.handle_entries(TriggerKind::Counter, &[stray], &mut p.doc, &mut queue);
    assert!(events.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Skill rings
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_skill_offset_written_after_delay() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    let events = animator.poll(&mut p.doc, &viewport_at(1800.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::SkillCircle), 1);
    assert_eq!(p.doc.style(p.progress, "stroke-dashoffset"), None);

    assert!(drain(&mut animator, &mut p.doc, &mut queue, Duration::from_millis(299)).is_empty());
    assert_eq!(p.doc.style(p.progress, "stroke-dashoffset"), None);

    let events = drain(&mut animator, &mut p.doc, &mut queue, Duration::from_millis(300));
    // 2 * pi * 45 * (1 - 0.75)
    assert_eq!(p.doc.style(p.progress, "stroke-dashoffset"), Some("70.69"));
    assert_eq!(finished(&events, TriggerKind::SkillCircle), 1);
}

#[test]
fn test_ring_without_progress_is_skipped() {
    let mut doc = Document::new();
    let skills = doc.append(
        None,
        ElementSpec::new("section")
            .class("skills-section")
            .rect(0.0, 400.0),
    );
    doc.append(
        Some(skills),
        ElementSpec::new("div")
            .class("skill-circle")
            .attr("data-percent", "90")
            .rect(0.0, 100.0),
    );
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut doc, &mut queue);

    animator.poll(&mut doc, &viewport_at(0.0), &mut queue);
    let events = drain(&mut animator, &mut doc, &mut queue, Duration::from_secs(1));
    assert!(events
        .iter()
        .any(|e| matches!(e, PageEvent::AnimationSkipped { kind: TriggerKind::SkillCircle, .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PageEvent::StyleChanged { .. })));
}

// ─────────────────────────────────────────────────────────────────────────────
// Reveal and intro
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reveal_hides_then_shows_once() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    assert_eq!(p.doc.style(p.card, "opacity"), Some("0"));
    assert_eq!(p.doc.style(p.card, "transform"), Some("translateY(30px)"));
    assert_eq!(p.doc.style(p.card, "transition"), Some("all 0.6s ease"));

    let events = animator.poll(&mut p.doc, &viewport_at(2500.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Reveal), 1);
    assert_eq!(finished(&events, TriggerKind::Reveal), 1);
    assert_eq!(p.doc.style(p.card, "opacity"), Some("1"));
    assert_eq!(p.doc.style(p.card, "transform"), Some("translateY(0)"));
    assert_eq!(p.doc.style(p.card, "transition"), Some("all 0.6s ease"));

    // Leaving and coming back delivers records but changes nothing
    animator.poll(&mut p.doc, &viewport_at(0.0), &mut queue);
    let events = animator.poll(&mut p.doc, &viewport_at(2500.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Reveal), 0);
    assert!(!events
        .iter()
        .any(|e| matches!(e, PageEvent::StyleChanged { .. })));
}

#[test]
fn test_reveal_waits_for_bottom_margin() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|c| c.features.intro = false));
    animator.attach(&mut p.doc, &mut queue);

    // Card top sits 30px above the fold, inside the 50px bottom margin
    let events = animator.poll(&mut p.doc, &viewport_at(2230.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Reveal), 0);
    assert_eq!(p.doc.style(p.card, "opacity"), Some("0"));

    // 100px past the shrunken fold: half the card is in
    let events = animator.poll(&mut p.doc, &viewport_at(2350.0), &mut queue);
    assert_eq!(started(&events, TriggerKind::Reveal), 1);
}

#[test]
fn test_intro_fades_hero_in() {
    let mut p = page();
    let mut queue = TimerQueue::new();
    let mut animator: Animator = Animator::new(settings(|_| {}));

    let events = animator.attach(&mut p.doc, &mut queue);
    assert_eq!(started(&events, TriggerKind::Intro), 1);
    assert_eq!(p.doc.style(p.hero, "opacity"), Some("0"));
    assert_eq!(p.doc.style(p.hero, "transform"), Some("translateY(50px)"));
    assert_eq!(p.doc.style(p.hero, "transition"), None);
    assert_eq!(
        animator.binding_for(TriggerKind::Intro, p.hero).unwrap().state,
        TargetState::Done
    );

    let events = drain(&mut animator, &mut p.doc, &mut queue, Duration::from_millis(300));
    assert_eq!(finished(&events, TriggerKind::Intro), 1);
    assert_eq!(p.doc.style(p.hero, "transition"), Some("all 1s ease"));
    assert_eq!(p.doc.style(p.hero, "opacity"), Some("1"));
    assert_eq!(p.doc.style(p.hero, "transform"), Some("translateY(0)"));
}
