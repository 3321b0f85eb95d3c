//! Counter ramp
//!
//! A counter climbs from its displayed value to `data-target` in fixed
//! increments of `ceil(target / speed)`, one increment per tick. The ramp is a
//! two-state machine evaluated once per tick: while the next value is below the
//! target it advances, otherwise it settles exactly on the target. Settling is
//! terminal and re-entering it is harmless.

/// Outcome of one ramp tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStep {
    /// Still below target; display this value and tick again
    Advance(i64),
    /// Display the target; the ramp is over
    Settle(i64),
}

impl RampStep {
    pub fn value(self) -> i64 {
        match self {
            RampStep::Advance(v) | RampStep::Settle(v) => v,
        }
    }

    pub fn is_settled(self) -> bool {
        matches!(self, RampStep::Settle(_))
    }
}

/// Parse a `data-target` value. Missing or non-integer targets yield `None`.
/// Negative targets are accepted; a counter already at or above one snaps to it.
pub fn parse_target(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Parse the currently displayed value.
///
/// Empty text counts as zero. Anything else that is not an integer yields
/// `None`, which the ramp treats as "already there".
pub fn parse_display(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse().ok()
}

/// Per-tick increment for a target at the given speed, never less than 1
pub fn increment(target: i64, speed: u32) -> i64 {
    if target <= 0 {
        return 1;
    }
    (target - 1) / i64::from(speed.max(1)) + 1
}

/// Evaluate one tick
pub fn step(current: Option<i64>, target: i64, speed: u32) -> RampStep {
    match current {
        Some(current) if current < target => {
            let next = current.saturating_add(increment(target, speed));
            if next >= target {
                RampStep::Settle(target)
            } else {
                RampStep::Advance(next)
            }
        }
        _ => RampStep::Settle(target),
    }
}
