//! Pointer input and frame-coalesced pointer tracking

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use biolink_core::math::{exceeds_threshold, Vec2};
use biolink_core::time::DEFAULT_THROTTLE;
use biolink_metrics::Counter;

use crate::scheduler::{Scheduler, TaskHandle};
use crate::settings::TrackerSettings;
use crate::throttle::Throttle;

/// Movement at or below this many units on both axes is treated as jitter.
pub const DEFAULT_JITTER_THRESHOLD: f32 = 1.0;

// Counter names
pub const POINTER_ACCEPTED: &str = "pointer.accepted";
pub const POINTER_SUPPRESSED: &str = "pointer.suppressed";
pub const FRAME_DISPATCHED: &str = "frame.dispatched";
pub const FRAME_CANCELLED: &str = "frame.cancelled";

/// Pointer-move event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.client_x, self.client_y)
    }
}

/// Whether a display frame is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    Idle,
    Pending,
}

type PointerCallback = Box<dyn FnMut(Vec2)>;

struct TrackerState {
    last_position: Vec2,
    pending_frame: Option<TaskHandle>,
    active: bool,
    counter: Counter,
}

/// Reduces pointer-move events to at most one callback per display frame and
/// per throttle window.
///
/// Moves within the jitter threshold of the last accepted position are
/// ignored. When the throttle admits a move, any outstanding frame request is
/// replaced by a new one; the callback receives the position when that frame
/// runs. [`cleanup`](Self::cleanup) (also run on drop) cancels outstanding
/// work so the callback never fires after teardown.
pub struct PointerTracker {
    scheduler: Rc<dyn Scheduler>,
    throttle: Throttle,
    jitter_threshold: f32,
    state: Rc<RefCell<TrackerState>>,
    callback: Rc<RefCell<PointerCallback>>,
}

impl PointerTracker {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        throttle: Duration,
        callback: impl FnMut(Vec2) + 'static,
    ) -> Self {
        let callback: PointerCallback = Box::new(callback);
        Self {
            throttle: Throttle::new(scheduler.clone(), throttle),
            scheduler,
            jitter_threshold: DEFAULT_JITTER_THRESHOLD,
            state: Rc::new(RefCell::new(TrackerState {
                last_position: Vec2::ZERO,
                pending_frame: None,
                active: true,
                counter: Counter::new(),
            })),
            callback: Rc::new(RefCell::new(callback)),
        }
    }

    /// Tracker with the default ~60fps throttle.
    pub fn with_default_throttle(
        scheduler: Rc<dyn Scheduler>,
        callback: impl FnMut(Vec2) + 'static,
    ) -> Self {
        Self::new(scheduler, DEFAULT_THROTTLE, callback)
    }

    pub fn from_settings(
        scheduler: Rc<dyn Scheduler>,
        settings: &TrackerSettings,
        callback: impl FnMut(Vec2) + 'static,
    ) -> Self {
        Self::new(scheduler, settings.throttle(), callback)
            .with_jitter_threshold(settings.jitter_threshold)
    }

    pub fn with_jitter_threshold(mut self, threshold: f32) -> Self {
        self.jitter_threshold = threshold;
        self
    }

    pub fn phase(&self) -> TrackerPhase {
        if self.state.borrow().pending_frame.is_some() {
            TrackerPhase::Pending
        } else {
            TrackerPhase::Idle
        }
    }

    /// False once [`cleanup`](Self::cleanup) has run.
    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    /// Last position that passed the jitter filter.
    pub fn last_position(&self) -> Vec2 {
        self.state.borrow().last_position
    }

    /// Event counts (empty without the `metrics` feature).
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        self.state.borrow().counter.snapshot()
    }

    pub fn on_pointer_move(&self, event: PointerEvent) {
        let position = event.position();
        {
            let mut state = self.state.borrow_mut();
            if !state.active {
                tracing::trace!("pointer move after cleanup ignored");
                return;
            }
            if !exceeds_threshold(position, state.last_position, self.jitter_threshold) {
                state.counter.increment(POINTER_SUPPRESSED);
                return;
            }
            state.last_position = position;
            state.counter.increment(POINTER_ACCEPTED);
        }

        if self.throttle.try_acquire() {
            self.request_frame(position);
        }
    }

    fn request_frame(&self, position: Vec2) {
        let mut state = self.state.borrow_mut();
        if let Some(previous) = state.pending_frame.take() {
            self.scheduler.cancel(previous);
            state.counter.increment(FRAME_CANCELLED);
        }

        let handle = self.scheduler.request_frame(Box::new(frame_task(
            Rc::downgrade(&self.state),
            Rc::downgrade(&self.callback),
            position,
        )));
        tracing::trace!(handle = handle.id(), x = position.x, y = position.y, "frame requested");
        state.pending_frame = Some(handle);
    }

    /// Cancel the outstanding frame and throttle timer. Later moves are
    /// ignored. Safe to call repeatedly.
    pub fn cleanup(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.pending_frame.take() {
            self.scheduler.cancel(handle);
            state.counter.increment(FRAME_CANCELLED);
        }
        self.throttle.cancel();
        if state.active {
            tracing::debug!("pointer tracker cleaned up");
        }
        state.active = false;
    }
}

fn frame_task(
    state: Weak<RefCell<TrackerState>>,
    callback: Weak<RefCell<PointerCallback>>,
    position: Vec2,
) -> impl FnOnce() {
    move || {
        let Some(state) = state.upgrade() else { return };
        {
            let mut state = state.borrow_mut();
            state.pending_frame = None;
            state.counter.increment(FRAME_DISPATCHED);
        }
        if let Some(callback) = callback.upgrade() {
            (callback.borrow_mut())(position);
        }
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::throttle::Debounce;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tracker(
        throttle: Duration,
    ) -> (Rc<ManualScheduler>, PointerTracker, Rc<RefCell<Vec<Vec2>>>) {
        let scheduler = Rc::new(ManualScheduler::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let tracker = PointerTracker::new(scheduler.clone(), throttle, move |position| {
            sink.borrow_mut().push(position)
        });
        (scheduler, tracker, seen)
    }

    #[test]
    fn dispatches_on_next_frame() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(120.0, 40.0));
        assert_eq!(tracker.phase(), TrackerPhase::Pending);
        assert!(seen.borrow().is_empty());

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(*seen.borrow(), vec![Vec2::new(120.0, 40.0)]);
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
    }

    #[test]
    fn throttle_bounds_callback_rate() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        // One move per millisecond for 99ms, frames every millisecond.
        for i in 0..100 {
            tracker.on_pointer_move(PointerEvent::new(10.0 + 2.0 * i as f32, 10.0));
            scheduler.run_frame();
            scheduler.advance(ms(1));
        }

        let window_ms = 99.0_f64;
        let bound = (window_ms / 16.0).ceil() as usize + 1;
        let calls = seen.borrow().len();
        assert!(calls <= bound, "{calls} callbacks exceeds bound {bound}");
        // Admitted at 0, 16, 32, 48, 64, 80, 96
        assert_eq!(calls, 7);
    }

    #[test]
    fn burst_inside_one_window_dispatches_once() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        for i in 0..10 {
            tracker.on_pointer_move(PointerEvent::new(5.0 * (i + 1) as f32, 0.0));
            scheduler.advance(ms(1));
            scheduler.run_frame();
        }

        assert_eq!(*seen.borrow(), vec![Vec2::new(5.0, 0.0)]);
        // The last accepted position is still tracked even when throttled.
        assert_eq!(tracker.last_position(), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn cleanup_cancels_pending_frame() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(300.0, 200.0));
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.pending_timers(), 1);

        tracker.cleanup();
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_timers(), 0);

        scheduler.advance(ms(100));
        scheduler.run_frame();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn cleanup_is_idempotent_and_final() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.cleanup();
        tracker.cleanup();
        assert!(!tracker.is_active());

        tracker.on_pointer_move(PointerEvent::new(50.0, 50.0));
        scheduler.tick();
        assert!(seen.borrow().is_empty());
        assert_eq!(scheduler.pending_frames(), 0);
    }

    #[test]
    fn jitter_is_suppressed() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(10.0, 10.0));
        scheduler.tick();
        scheduler.advance(ms(20));

        tracker.on_pointer_move(PointerEvent::new(10.5, 11.0));
        tracker.on_pointer_move(PointerEvent::new(9.0, 9.0));
        scheduler.tick();

        assert_eq!(*seen.borrow(), vec![Vec2::new(10.0, 10.0)]);
        assert_eq!(tracker.last_position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn first_move_near_origin_is_jitter() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(0.5, 1.0));
        scheduler.tick();
        assert!(seen.borrow().is_empty());
        assert_eq!(tracker.phase(), TrackerPhase::Idle);
    }

    #[test]
    fn later_admission_replaces_pending_frame() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(10.0, 10.0));
        scheduler.advance(ms(16));
        tracker.on_pointer_move(PointerEvent::new(40.0, 10.0));
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.run_frame();
        assert_eq!(*seen.borrow(), vec![Vec2::new(40.0, 10.0)]);
    }

    #[test]
    fn drop_cancels_outstanding_work() {
        let (scheduler, tracker, seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(10.0, 10.0));
        drop(tracker);

        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_timers(), 0);
        scheduler.tick();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn settings_configure_threshold() {
        let scheduler = Rc::new(ManualScheduler::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let settings = TrackerSettings {
            throttle_ms: 0,
            jitter_threshold: 5.0,
        };
        let tracker = PointerTracker::from_settings(scheduler.clone(), &settings, move |p| {
            sink.borrow_mut().push(p)
        });

        tracker.on_pointer_move(PointerEvent::new(4.0, 4.0));
        tracker.on_pointer_move(PointerEvent::new(6.0, 0.0));
        scheduler.advance(Duration::ZERO);
        scheduler.run_frame();

        assert_eq!(*seen.borrow(), vec![Vec2::new(6.0, 0.0)]);
    }

    #[test]
    fn trackers_are_independent() {
        let scheduler = Rc::new(ManualScheduler::new());
        let hits = Rc::new(RefCell::new(Vec::new()));

        let a_hits = hits.clone();
        let a = PointerTracker::with_default_throttle(scheduler.clone(), move |_| {
            a_hits.borrow_mut().push('a')
        });
        let b_hits = hits.clone();
        let b = PointerTracker::with_default_throttle(scheduler.clone(), move |_| {
            b_hits.borrow_mut().push('b')
        });

        a.on_pointer_move(PointerEvent::new(10.0, 10.0));
        b.on_pointer_move(PointerEvent::new(10.0, 10.0));
        b.cleanup();
        scheduler.run_frame();

        assert_eq!(*hits.borrow(), vec!['a']);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn counters_track_outcomes() {
        let (scheduler, tracker, _seen) = tracker(ms(16));

        tracker.on_pointer_move(PointerEvent::new(10.0, 10.0));
        tracker.on_pointer_move(PointerEvent::new(10.5, 10.0));
        scheduler.run_frame();
        tracker.on_pointer_move(PointerEvent::new(30.0, 10.0));
        tracker.cleanup();

        let counters = tracker.counters();
        assert!(counters.contains(&(POINTER_ACCEPTED, 2)));
        assert!(counters.contains(&(POINTER_SUPPRESSED, 1)));
        assert!(counters.contains(&(FRAME_DISPATCHED, 1)));
    }

    #[test]
    fn cancelling_a_task_that_owns_a_tracker_tears_it_down() {
        let (scheduler, tracker, seen) = tracker(ms(16));
        tracker.on_pointer_move(PointerEvent::new(10.0, 10.0));
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.pending_timers(), 1);

        // Dropping the task drops the tracker, whose cleanup re-enters the
        // scheduler from inside cancel.
        let debounce = Debounce::new(scheduler.clone(), ms(50));
        debounce.call(move || drop(tracker));
        debounce.cancel();

        assert!(!debounce.is_pending());
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.pending_timers(), 0);
        scheduler.tick();
        assert!(seen.borrow().is_empty());
    }
}
