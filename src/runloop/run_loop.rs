//! Single-threaded timer loop with run modes
//!
//! Everything scheduled here runs on the thread that owns the `RunLoop`.
//! Other threads talk to it through the channel handed to [`RunLoop::run`].

use crate::runloop::clock::{Clock, ManualClock, SystemClock};
use std::cell::RefCell;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Mode a run loop is running in, or a timer is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunLoopMode {
    /// Idle mode. The loop is in this mode whenever no gesture is tracking.
    Default,
    /// Mode entered while a scroll or drag gesture is being tracked.
    Tracking,
    /// Registration-only mode: timers in it fire in every loop mode.
    Common,
}

impl RunLoopMode {
    /// Whether a timer registered for `self` may fire while the loop runs in `current`.
    pub fn fires_in(self, current: RunLoopMode) -> bool {
        self == RunLoopMode::Common || self == current
    }
}

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    /// `None` when the deadline lies past what `Instant` can represent; such a
    /// timer only runs through [`RunLoop::fire`].
    deadline: Option<Instant>,
    mode: RunLoopMode,
    callback: Box<dyn FnOnce()>,
}

struct RunLoopState {
    timers: Vec<Timer>,
    next_id: u64,
    mode: RunLoopMode,
}

impl RunLoopState {
    /// Index of the earliest timer that may fire in the current mode.
    /// Ties on deadline go to the timer scheduled first.
    fn earliest_eligible(&self, below_id: Option<TimerId>) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.mode.fires_in(self.mode))
            .filter(|(_, t)| below_id.is_none_or(|limit| t.id < limit))
            .filter_map(|(index, t)| t.deadline.map(|deadline| (deadline, t.id, index)))
            .min()
            .map(|(_, _, index)| index)
    }

    fn take(&mut self, id: TimerId) -> Option<Timer> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        Some(self.timers.remove(index))
    }
}

/// Cooperative timer loop standing in for the host's main event loop
///
/// Cloning a `RunLoop` yields another handle to the same loop.
#[derive(Clone)]
pub struct RunLoop {
    state: Rc<RefCell<RunLoopState>>,
    clock: Rc<dyn Clock>,
}

impl RunLoop {
    /// Create a run loop in `Default` mode driven by `clock`
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Rc::new(RefCell::new(RunLoopState {
                timers: Vec::new(),
                next_id: 0,
                mode: RunLoopMode::Default,
            })),
            clock,
        }
    }

    /// Create a run loop driven by wall-clock time
    pub fn with_system_clock() -> Self {
        Self::new(Rc::new(SystemClock))
    }

    /// Current time on the loop's clock
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedule `callback` to run once, `delay` from now, while the loop is in
    /// a mode compatible with `mode`.
    pub fn schedule(
        &self,
        delay: Duration,
        mode: RunLoopMode,
        callback: impl FnOnce() + 'static,
    ) -> TimerId {
        let deadline = self.now().checked_add(delay);
        if deadline.is_none() {
            warn!("Timer delay {:?} is out of range; timer fires only when flushed", delay);
        }
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        state.timers.push(Timer {
            id,
            deadline,
            mode,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a timer without running it. Returns `false` if it already fired
    /// or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.state.borrow_mut().take(id).is_some()
    }

    /// Run a pending timer right now, whatever its deadline and mode.
    /// Returns `false` if the timer is no longer scheduled.
    pub fn fire(&self, id: TimerId) -> bool {
        let timer = self.state.borrow_mut().take(id);
        match timer {
            Some(timer) => {
                (timer.callback)();
                true
            }
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.state.borrow().timers.iter().any(|t| t.id == id)
    }

    /// Number of timers waiting to fire, in any mode
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Mode the loop is currently running in
    pub fn current_mode(&self) -> RunLoopMode {
        self.state.borrow().mode
    }

    /// Switch the loop to `mode`.
    ///
    /// `Common` is a registration mode only; asking the loop to run in it
    /// leaves the current mode unchanged.
    pub fn set_mode(&self, mode: RunLoopMode) {
        if mode == RunLoopMode::Common {
            warn!("Run loop cannot run in Common mode; keeping current mode");
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.mode != mode {
            debug!("Run loop mode {:?} -> {:?}", state.mode, mode);
            state.mode = mode;
        }
    }

    /// Deadline of the earliest timer allowed to fire in the current mode
    pub fn next_deadline(&self) -> Option<Instant> {
        let state = self.state.borrow();
        state
            .earliest_eligible(None)
            .and_then(|index| state.timers[index].deadline)
    }

    /// Fire every eligible timer whose deadline has passed, earliest first.
    ///
    /// Timers scheduled by callbacks during this pass wait for the next one.
    /// Returns the number of callbacks run.
    pub fn run_due_timers(&self) -> usize {
        let now = self.now();
        let watermark = TimerId(self.state.borrow().next_id);
        let mut fired = 0;

        loop {
            let timer = {
                let mut state = self.state.borrow_mut();
                match state.earliest_eligible(Some(watermark)) {
                    Some(index) if state.timers[index].deadline.is_some_and(|d| d <= now) => {
                        Some(state.timers.remove(index))
                    }
                    _ => None,
                }
            };

            // Borrow is released here so the callback may touch the loop.
            let Some(timer) = timer else { break };
            (timer.callback)();
            fired += 1;
        }

        fired
    }

    /// Step `clock` forward by `by`, stopping at each eligible deadline on the
    /// way so timers observe the time they were due at.
    ///
    /// `clock` must be the clock this loop was created with. A step past the
    /// range of `Instant` runs every timer that has a deadline and leaves the
    /// clock at the last one.
    pub fn advance(&self, clock: &ManualClock, by: Duration) -> usize {
        let target = clock.now().checked_add(by);
        let mut fired = 0;

        while let Some(deadline) = self.next_deadline() {
            if target.is_some_and(|target| deadline > target) {
                break;
            }
            clock.set(deadline);
            fired += self.run_due_timers();
        }

        if let Some(target) = target {
            clock.set(target);
        }
        fired
    }

    /// Drive the loop from a channel of host events until `handler` breaks or
    /// every sender is gone.
    ///
    /// Blocks on the channel only until the next eligible timer is due, so
    /// timers fire on time while events trickle in. Meant for loops on a
    /// [`SystemClock`].
    pub fn run<E>(&self, events: &Receiver<E>, mut handler: impl FnMut(E) -> ControlFlow<()>) {
        info!("Entering run loop");

        loop {
            self.run_due_timers();

            let received = match self.next_deadline() {
                Some(deadline) => {
                    events.recv_timeout(deadline.saturating_duration_since(self.now()))
                }
                None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(event) => {
                    if handler(event).is_break() {
                        debug!("Run loop handler requested exit");
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // A timer is due; fire it on the next turn
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Host event channel disconnected. Exiting run loop.");
                    break;
                }
            }
        }

        let abandoned = self.pending_timers();
        if abandoned > 0 {
            debug!("{} timer(s) still pending at run loop exit", abandoned);
        }
        info!("Run loop exited");
    }
}

impl fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RunLoop")
            .field("mode", &state.mode)
            .field("pending_timers", &state.timers.len())
            .finish_non_exhaustive()
    }
}
