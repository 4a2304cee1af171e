//! Event-loop timer access for the core.
//!
//! The browser hands out integer handles for timeouts, intervals and animation
//! frames; the core only ever stores and cancels them, and schedules its own
//! one-shot callbacks through [`Timers::set_timeout`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait Timers {
    /// Run `callback` once after `delay`. Never runs it synchronously.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
    fn clear_timeout(&self, handle: TimerHandle);
    fn clear_interval(&self, handle: TimerHandle);
    fn cancel_animation_frame(&self, handle: FrameHandle);
}

/// A timer callback that can be handed to more than one scheduling path.
///
/// Whichever path fires first runs it; later fires do nothing. Hosts use it to
/// fall back to another queue when their timer API refuses the callback.
#[derive(Clone)]
pub struct OnceCallback(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl OnceCallback {
    pub fn new(callback: Box<dyn FnOnce()>) -> Self {
        Self(Rc::new(RefCell::new(Some(callback))))
    }

    /// Run the callback unless it already ran.
    pub fn fire(&self) -> bool {
        let callback = self.0.borrow_mut().take();
        match callback {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.0.borrow().is_none()
    }
}

struct Pending {
    handle: TimerHandle,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

/// Virtual-clock [`Timers`] for hosts without an event loop.
///
/// Time only moves in [`ManualTimers::advance`]; due callbacks fire in order of
/// their deadline (ties in scheduling order). Callbacks may schedule more work.
#[derive(Default)]
pub struct ManualTimers {
    now: Cell<Duration>,
    next_id: Cell<i32>,
    pending: RefCell<Vec<Pending>>,
    cleared: RefCell<Vec<TimerHandle>>,
    cancelled_frames: RefCell<Vec<FrameHandle>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of scheduled callbacks that have not fired.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Handles passed to `clear_timeout`/`clear_interval`, in call order.
    pub fn cleared(&self) -> Vec<TimerHandle> {
        self.cleared.borrow().clone()
    }

    pub fn cancelled_frames(&self) -> Vec<FrameHandle> {
        self.cancelled_frames.borrow().clone()
    }

    /// Move the clock forward, firing every callback due on the way.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            // Release the borrow before running the callback; it may schedule.
            let next = {
                let mut pending = self.pending.borrow_mut();
                let due_idx = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.handle.0))
                    .map(|(i, _)| i);
                due_idx.map(|i| pending.remove(i))
            };
            match next {
                Some(p) => {
                    if p.due > self.now.get() {
                        self.now.set(p.due);
                    }
                    (p.callback)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    /// Fire everything currently scheduled, however far out.
    pub fn run_all(&self) {
        let last_due = self.pending.borrow().iter().map(|p| p.due).max();
        if let Some(due) = last_due {
            self.advance(due.saturating_sub(self.now.get()));
        }
    }
}

impl Timers for ManualTimers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TimerHandle(id);
        self.pending.borrow_mut().push(Pending {
            handle,
            due: self.now.get() + delay,
            callback,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.pending.borrow_mut().retain(|p| p.handle != handle);
        self.cleared.borrow_mut().push(handle);
    }

    fn clear_interval(&self, handle: TimerHandle) {
        self.clear_timeout(handle);
    }

    fn cancel_animation_frame(&self, handle: FrameHandle) {
        self.cancelled_frames.borrow_mut().push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_callback_runs_on_first_fire_only() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let cb = OnceCallback::new(Box::new(move || h.set(h.get() + 1)));
        let fallback = cb.clone();
        assert!(!cb.has_fired());
        assert!(fallback.fire());
        assert!(!cb.fire());
        assert!(cb.has_fired());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn callbacks_fire_in_deadline_order() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (label, ms) in [("late", 30u64), ("early", 10), ("mid", 20)] {
            let log = log.clone();
            timers.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || log.borrow_mut().push(label)),
            );
        }
        timers.advance(Duration::from_millis(25));
        assert_eq!(*log.borrow(), vec!["early", "mid"]);
        timers.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["early", "mid", "late"]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn cleared_timeout_never_fires() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let h = timers.set_timeout(Duration::from_millis(5), Box::new(move || f.set(true)));
        timers.clear_timeout(h);
        timers.advance(Duration::from_secs(1));
        assert!(!fired.get());
        assert_eq!(timers.cleared(), vec![h]);
    }

    #[test]
    fn callbacks_may_schedule_follow_ups() {
        let timers = Rc::new(ManualTimers::new());
        let hits = Rc::new(Cell::new(0));
        let t = timers.clone();
        let h = hits.clone();
        timers.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                h.set(h.get() + 1);
                let h2 = h.clone();
                t.set_timeout(
                    Duration::from_millis(10),
                    Box::new(move || h2.set(h2.get() + 1)),
                );
            }),
        );
        timers.advance(Duration::from_millis(20));
        assert_eq!(hits.get(), 2);
        assert_eq!(timers.now(), Duration::from_millis(20));
    }
}
