//! Timer and display-frame scheduling
//!
//! Pointer effects never block. They schedule a task for later, either after a
//! delay or on the next display frame, and keep the returned handle so the
//! task can be cancelled. Hosts provide the [`Scheduler`]; tests and headless
//! hosts drive a [`ManualScheduler`] with a synthetic clock.

use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

use biolink_core::time::FRAME_INTERVAL;

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled timer or frame task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Single-threaded scheduling capability.
///
/// Methods take `&self` so tasks may schedule or cancel further work while
/// they run.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Run `task` on the next display frame.
    fn request_frame(&self, task: Task) -> TaskHandle;

    /// Drop a scheduled task without running it. Unknown or already-run
    /// handles are ignored.
    fn cancel(&self, handle: TaskHandle);
}

struct Timer {
    due: Duration,
    handle: TaskHandle,
    task: Task,
}

#[derive(Default)]
struct Queues {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
    frames: Vec<(TaskHandle, Task)>,
}

impl Queues {
    fn allocate(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }

    /// Remove the earliest timer due at or before `deadline`.
    fn pop_due(&mut self, deadline: Duration) -> Option<Timer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= deadline)
            .min_by_key(|(_, timer)| (timer.due, timer.handle))
            .map(|(index, _)| index)?;
        Some(self.timers.remove(index))
    }
}

/// Scheduler driven explicitly by its owner.
///
/// Time only moves on [`advance`](Self::advance); frames only run on
/// [`run_frame`](Self::run_frame). Timers fire in due order, ties broken by
/// scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    queues: RefCell<Queues>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    pub fn advance(&self, by: Duration) {
        let deadline = self.queues.borrow().now + by;
        loop {
            // Release the borrow before running: timers may schedule more work.
            let due = self.queues.borrow_mut().pop_due(deadline);
            let Some(timer) = due else { break };
            self.queues.borrow_mut().now = timer.due;
            tracing::trace!(handle = timer.handle.id(), "timer fired");
            (timer.task)();
        }
        self.queues.borrow_mut().now = deadline;
    }

    /// Run the frame tasks requested before this call. Frames requested while
    /// running land in the next frame. Returns the number of tasks run.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<TaskHandle> = self
            .queues
            .borrow()
            .frames
            .iter()
            .map(|(handle, _)| *handle)
            .collect();

        let mut ran = 0;
        for handle in batch {
            // An earlier task in this batch may have cancelled this one.
            let task = {
                let mut queues = self.queues.borrow_mut();
                queues
                    .frames
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|index| queues.frames.remove(index).1)
            };
            if let Some(task) = task {
                task();
                ran += 1;
            }
        }
        ran
    }

    /// Advance one display frame interval, then run the frame.
    pub fn tick(&self) -> usize {
        self.advance(FRAME_INTERVAL);
        self.run_frame()
    }

    /// Time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.queues.borrow().now
    }

    pub fn pending_frames(&self) -> usize {
        self.queues.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.queues.borrow().timers.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut queues = self.queues.borrow_mut();
        let handle = queues.allocate();
        let due = queues.now + delay;
        queues.timers.push(Timer { due, handle, task });
        handle
    }

    fn request_frame(&self, task: Task) -> TaskHandle {
        let mut queues = self.queues.borrow_mut();
        let handle = queues.allocate();
        queues.frames.push((handle, task));
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        // Dropping a task can re-enter the scheduler (a captured tracker
        // cancels its own work on drop), so release the borrow first.
        let (timer, frame) = {
            let mut queues = self.queues.borrow_mut();
            let timer = queues
                .timers
                .iter()
                .position(|timer| timer.handle == handle)
                .map(|index| queues.timers.remove(index));
            let frame = queues
                .frames
                .iter()
                .position(|(h, _)| *h == handle)
                .map(|index| queues.frames.remove(index));
            (timer, frame)
        };
        drop(timer);
        drop(frame);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queues = self.queues.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &queues.now)
            .field("timers", &queues.timers.len())
            .field("frames", &queues.frames.len())
            .finish()
    }
}
