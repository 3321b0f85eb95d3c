// Page session - one page, one viewport, one timeline
//
// A session owns the document, the animator and the timer queue. It is driven
// two ways:
// - synchronously (`load`, `scroll_to`, `advance_to`), which is what tests use
// - by `run_script`, which walks a scroll script and the pending timers on one
//   timeline, pacing itself against tokio time and streaming events out
//
// Page time always comes from the timer queue's virtual clock; wall-clock time
// only decides how long to wait between steps.

use crate::animator::{Animator, AnimatorSettings, Task};
use crate::config::{Config, MIN_PLAYBACK_SPEED};
use crate::dom::{Document, ScrollStep};
use crate::events::{PageEvent, Stats};
use crate::observer::{Viewport, ViewportObserver, VisibilityObserver};
use crate::scheduler::{Scheduler, TimerQueue};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

pub struct PageSession<O = ViewportObserver> {
    doc: Document,
    viewport: Viewport,
    animator: Animator<O>,
    timers: TimerQueue<Task>,
    loaded: bool,
}

impl<O: VisibilityObserver> PageSession<O> {
    /// Build a session. Fails only on invalid selectors or root margins.
    pub fn new(document: Document, viewport_height: f64, config: &Config) -> Result<Self> {
        let settings = AnimatorSettings::from_config(config)?;
        Ok(Self {
            doc: document,
            viewport: Viewport::new(viewport_height),
            animator: Animator::new(settings),
            timers: TimerQueue::new(),
            loaded: false,
        })
    }

    #[cfg(test)]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[cfg(test)]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[cfg(test)]
    pub fn animator(&self) -> &Animator<O> {
        &self.animator
    }

    /// Current page time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Largest scroll offset that still fills the viewport
    pub fn max_scroll(&self) -> f64 {
        (self.doc.height() - self.viewport.height).max(0.0)
    }

    /// Attach the animator and deliver the initial records at the current
    /// scroll position. Loading twice does nothing.
    pub fn load(&mut self) -> Vec<PageEvent> {
        if self.loaded {
            return Vec::new();
        }
        self.loaded = true;
        tracing::info!(
            "Page loaded: {} element(s), {:.0}px tall, viewport {:.0}px",
            self.doc.len(),
            self.doc.height(),
            self.viewport.height
        );

        let mut events = self.animator.attach(&mut self.doc, &mut self.timers);
        events.extend(
            self.animator
                .poll(&mut self.doc, &self.viewport, &mut self.timers),
        );
        events
    }

    /// Scroll to `y` (clamped to the page) and act on visibility changes
    pub fn scroll_to(&mut self, y: f64) -> Vec<PageEvent> {
        let y = if y.is_finite() { y } else { 0.0 };
        self.viewport.scroll_y = y.clamp(0.0, self.max_scroll());
        tracing::debug!("Scrolled to {:.0}", self.viewport.scroll_y);

        let mut events = vec![PageEvent::Scrolled {
            at_ms: self.now().as_millis() as u64,
            scroll_y: self.viewport.scroll_y,
        }];
        events.extend(
            self.animator
                .poll(&mut self.doc, &self.viewport, &mut self.timers),
        );
        events
    }

    /// Run every timer due at or before `t`, including timers those timers
    /// schedule, then move the clock to `t`.
    pub fn advance_to(&mut self, t: Duration) -> Vec<PageEvent> {
        let mut events = Vec::new();
        while let Some(task) = self.timers.pop_due(t) {
            events.extend(self.animator.run_task(task, &mut self.doc, &mut self.timers));
        }
        self.timers.set_now(t);
        events
    }
}

/// Forward events to the output channel, counting them on the way
async fn forward(tx: &mpsc::Sender<PageEvent>, stats: &mut Stats, events: Vec<PageEvent>) {
    for event in events {
        stats.record(&event);
        // A closed receiver only means nobody is listening any more
        let _ = tx.send(event).await;
    }
}

/// Resolve when a shutdown is requested.
///
/// Returns `false` if the sender went away without asking; the receiver is
/// then cleared and never polled again.
async fn wait_for_shutdown(rx: &mut Option<oneshot::Receiver<()>>) -> bool {
    match rx.as_mut() {
        Some(inner) => {
            let requested = inner.await.is_ok();
            *rx = None;
            requested
        }
        None => std::future::pending().await,
    }
}

/// How long to wait before the next point on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pace {
    /// Speed 0: do not wait, only give other tasks a turn
    Now,
    Until(tokio::time::Instant),
    /// The wait does not fit in a `Duration`
    OutOfReach,
}

impl Pace {
    fn for_step(started: tokio::time::Instant, next: Duration, speed: f64) -> Self {
        if speed.is_nan() || speed <= 0.0 {
            return Pace::Now;
        }
        let speed = speed.max(MIN_PLAYBACK_SPEED);
        Duration::try_from_secs_f64(next.as_secs_f64() / speed)
            .ok()
            .and_then(|wait| started.checked_add(wait))
            .map_or(Pace::OutOfReach, Pace::Until)
    }

    async fn wait(self) {
        match self {
            Pace::Until(deadline) => tokio::time::sleep_until(deadline).await,
            Pace::Now | Pace::OutOfReach => tokio::task::yield_now().await,
        }
    }
}

/// Play a scroll script against the page.
///
/// Scroll steps and timer deadlines share one timeline. Timers due at the same
/// instant as a scroll step run first. Waits are `page time / playback_speed`
/// of real time; a speed of 0 runs as fast as possible. Stops when the script
/// is exhausted and no timers remain, or on shutdown.
pub async fn run_script<O: VisibilityObserver>(
    session: &mut PageSession<O>,
    script: &[ScrollStep],
    tx: mpsc::Sender<PageEvent>,
    shutdown: oneshot::Receiver<()>,
    playback_speed: f64,
) -> Stats {
    let mut stats = Stats::default();
    let mut shutdown = Some(shutdown);
    let started = tokio::time::Instant::now();
    let mut steps = script.iter().peekable();

    forward(&tx, &mut stats, session.load()).await;

    loop {
        let next_step = steps.peek().map(|s| Duration::from_millis(s.at_ms));
        let Some(next) = next_step.into_iter().chain(session.next_deadline()).min() else {
            tracing::debug!("Script exhausted and no timers pending");
            break;
        };

        let pace = Pace::for_step(started, next, playback_speed);
        if pace == Pace::OutOfReach {
            tracing::warn!(
                "Next step at {}ms is out of reach at speed {}; stopping playback",
                next.as_millis(),
                playback_speed
            );
            break;
        }

        // Shutdown is checked first so a pending request wins over a due step
        let woke = tokio::select! {
            biased;
            requested = wait_for_shutdown(&mut shutdown) => Some(requested),
            _ = pace.wait() => None,
        };
        match woke {
            Some(true) => {
                tracing::info!("Shutdown requested, stopping playback");
                break;
            }
            // Sender dropped: nothing can stop us now, go back to waiting
            Some(false) => continue,
            None => {}
        }

        forward(&tx, &mut stats, session.advance_to(next)).await;
        while let Some(step) = steps.next_if(|s| Duration::from_millis(s.at_ms) <= next) {
            forward(&tx, &mut stats, session.scroll_to(step.y)).await;
        }
    }

    tracing::info!(
        "Playback finished at {}ms: {}",
        session.now().as_millis(),
        stats.summary()
    );
    stats
}
