//! Visibility observation
//!
//! The animator never asks "is this element on screen?" itself. It registers
//! targets with a `VisibilityObserver` and consumes the `IntersectionEntry`
//! records the observer hands back, the same shape a browser's intersection
//! observer delivers. `ViewportObserver` is the geometric implementation used
//! by the page simulator; tests substitute scripted observers.

mod margin;
mod viewport;

pub use margin::RootMargin;
pub use viewport::{Viewport, ViewportObserver};

use crate::dom::{Document, ElementId};

/// Observation settings for one observer
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the target (0.0 - 1.0) that must be visible to qualify
    pub threshold: f64,
    /// Grows (positive) or shrinks (negative) the root before intersecting
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            threshold,
            root_margin,
        }
    }

    /// Whether an entry is visible enough to trigger
    pub fn qualifies(&self, entry: &IntersectionEntry) -> bool {
        entry.is_intersecting && entry.ratio >= self.threshold
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::new(0.0, RootMargin::default())
    }
}

/// A change in a target's visibility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    /// Visible fraction of the target, 0.0 - 1.0
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Capability interface for visibility detection
///
/// Implementations decide how visibility is measured; callers only register
/// targets and drain records.
pub trait VisibilityObserver {
    fn with_options(options: ObserverOptions) -> Self
    where
        Self: Sized;

    fn options(&self) -> &ObserverOptions;

    /// Start observing a target. Observing twice is a no-op.
    fn observe(&mut self, target: ElementId);

    fn is_observing(&self, target: ElementId) -> bool;

    /// Records for targets whose visibility changed since the last call.
    ///
    /// Every newly observed target produces one record on its first poll.
    fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionEntry>;
}
