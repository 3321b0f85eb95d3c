// Geometric visibility observer
//
// Computes intersection of each target's vertical box with the viewport
// (adjusted by the root margin). Mirrors the delivery rules of a browser
// intersection observer with a single threshold:
// - a target produces one record on the first poll after `observe`
// - afterwards only when it starts/stops intersecting, or its ratio crosses
//   the threshold in either direction

use super::{IntersectionEntry, ObserverOptions, VisibilityObserver};
use crate::dom::{Document, ElementId, Rect};

/// The visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            height: height.max(0.0),
        }
    }

    /// Root rectangle after applying the observer's margin
    pub fn root_rect(&self, options: &ObserverOptions) -> Rect {
        let margin = options.root_margin;
        let top = self.scroll_y - margin.top.resolve(self.height);
        let bottom = self.scroll_y + self.height + margin.bottom.resolve(self.height);
        Rect::new(top, bottom - top)
    }
}

/// Visibility of `target` inside `root`: (ratio, is_intersecting)
pub fn intersect(target: Rect, root: Rect) -> (f64, bool) {
    // Edge-adjacent boxes count as intersecting (zero-area intersection)
    let is_intersecting = target.top <= root.bottom() && target.bottom() >= root.top;
    if !is_intersecting {
        return (0.0, false);
    }
    if target.height == 0.0 {
        return (1.0, true);
    }
    let overlap = target.bottom().min(root.bottom()) - target.top.max(root.top);
    ((overlap.max(0.0) / target.height).min(1.0), true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observed {
    target: ElementId,
    /// (is_intersecting, at_or_above_threshold) at the last delivered record
    last: Option<(bool, bool)>,
}

/// Observer backed by document geometry
#[derive(Debug, Clone)]
pub struct ViewportObserver {
    options: ObserverOptions,
    targets: Vec<Observed>,
}

impl VisibilityObserver for ViewportObserver {
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
        if !self.is_observing(target) {
            self.targets.push(Observed { target, last: None });
        }
    }

    fn is_observing(&self, target: ElementId) -> bool {
        self.targets.iter().any(|o| o.target == target)
    }

    fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let root = viewport.root_rect(&self.options);
        let threshold = self.options.threshold;
        let mut records = Vec::new();

        for observed in &mut self.targets {
            // Targets removed from the document simply stop reporting
            let Some(rect) = doc.rect(observed.target) else {
                continue;
            };
            let (ratio, is_intersecting) = intersect(rect, root);
            let state = (is_intersecting, ratio >= threshold);
            if observed.last == Some(state) {
                continue;
            }
            observed.last = Some(state);
            records.push(IntersectionEntry {
                target: observed.target,
                ratio,
                is_intersecting,
            });
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;
    use crate::observer::RootMargin;

    #[test]
    fn test_intersect_ratios() {
        let root = Rect::new(0.0, 800.0);
        // Fully inside
        assert_eq!(intersect(Rect::new(100.0, 200.0), root), (1.0, true));
        // Half below the fold
        assert_eq!(intersect(Rect::new(700.0, 200.0), root), (0.5, true));
        // Touching the bottom edge
        assert_eq!(intersect(Rect::new(800.0, 100.0), root), (0.0, true));
        // Entirely below
        assert_eq!(intersect(Rect::new(900.0, 100.0), root), (0.0, false));
        // Zero-height element inside the root
        assert_eq!(intersect(Rect::new(10.0, 0.0), root), (1.0, true));
    }

    #[test]
    fn test_negative_bottom_margin_shrinks_root() {
        let mut viewport = Viewport::new(800.0);
        viewport.scroll_y = 1000.0;
        let options = ObserverOptions::new(0.1, "0px 0px -50px 0px".parse().unwrap());
        let root = viewport.root_rect(&options);
        assert_eq!(root.top, 1000.0);
        assert_eq!(root.bottom(), 1750.0);
    }

    fn observer_with_target(top: f64) -> (Document, ViewportObserver, ElementId) {
        let mut doc = Document::new();
        let target = doc.append(None, ElementSpec::new("div").rect(top, 100.0));
        let mut observer =
            ViewportObserver::with_options(ObserverOptions::new(0.3, RootMargin::default()));
        observer.observe(target);
        (doc, observer, target)
    }

    #[test]
    fn test_initial_record_is_always_delivered() {
        let (doc, mut observer, target) = observer_with_target(5000.0);
        let viewport = Viewport::new(800.0);

        let records = observer.take_records(&doc, &viewport);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, target);
        assert!(!records[0].is_intersecting);

        // Nothing changed, nothing delivered
        assert!(observer.take_records(&doc, &viewport).is_empty());
    }

    #[test]
    fn test_records_on_threshold_crossings_only() {
        let (doc, mut observer, _) = observer_with_target(1000.0);
        let mut viewport = Viewport::new(800.0);
        observer.take_records(&doc, &viewport);

        // 20% visible: intersecting but below threshold -> one record
        viewport.scroll_y = 220.0;
        let records = observer.take_records(&doc, &viewport);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_intersecting);
        assert!((records[0].ratio - 0.2).abs() < 1e-9);

        // 25%: still below threshold, no crossing
        viewport.scroll_y = 225.0;
        assert!(observer.take_records(&doc, &viewport).is_empty());

        // 60%: crossed the threshold
        viewport.scroll_y = 260.0;
        let records = observer.take_records(&doc, &viewport);
        assert_eq!(records.len(), 1);
        assert!(records[0].ratio >= 0.3);
    }

    #[test]
    fn test_observe_is_idempotent() {
        let (doc, mut observer, target) = observer_with_target(0.0);
        observer.observe(target);
        assert_eq!(observer.take_records(&doc, &Viewport::new(800.0)).len(), 1);
    }
}
