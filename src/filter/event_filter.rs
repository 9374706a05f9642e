//! Debounce filter implementation
//!
//! When focus hops between text fields the platform can post a hide and two
//! show notifications within a tenth of a second, each with a different
//! keyboard height. Acting on every one of them makes the container jump. The
//! filter collapses such a burst into the single value that was current when
//! the burst went quiet.

use crate::geometry::Rect;
use crate::runloop::{RunLoop, RunLoopMode, TimerId};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

/// Quiescence window used when the owner doesn't pick one
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

/// Tunables for an [`EventFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfiguration {
    /// How long the input has to stay unchanged before it is settled
    pub delay: Duration,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

/// Receives settled values from an [`EventFilter`]
pub trait FilterDelegate<T> {
    /// Called once per settled burst with the value now in the output slot
    fn filter_did_settle(&self, value: &T);
}

/// Whether a filter has a settlement outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// No timer pending
    Idle,
    /// A timer will settle the current input unless replaced or cancelled
    Pending,
}

struct Slots<T> {
    configuration: FilterConfiguration,
    input: Option<T>,
    output: Option<T>,
    timer: Option<TimerId>,
}

struct Shared<T> {
    slots: RefCell<Slots<T>>,
    delegate: Weak<dyn FilterDelegate<T>>,
    run_loop: RunLoop,
}

impl<T: Clone + PartialEq + fmt::Debug> Shared<T> {
    /// Timer body: promote the input to the output and tell the delegate.
    fn settle(&self) {
        let settled = {
            let slots = &mut *self.slots.borrow_mut();
            slots.timer = None;
            slots.output.clone_from(&slots.input);
            slots.output.clone()
        };

        let Some(value) = settled else {
            return;
        };
        debug!("Filter settled on {:?}", value);

        match self.delegate.upgrade() {
            Some(delegate) => delegate.filter_did_settle(&value),
            None => debug!("Filter delegate is gone; settled value not delivered"),
        }
    }
}

/// Temporal filter that delivers the last value of each burst of changes
///
/// Every change to the input restarts a quiescence timer of
/// [`FilterConfiguration::delay`]. When the timer fires the input is copied to
/// the output and the delegate is notified. Reassigning an equal value leaves
/// the running timer alone.
///
/// The timer is registered for [`RunLoopMode::Common`] so it keeps firing while
/// the loop tracks a drag. With `Default` registration an interactive keyboard
/// dismissal would hold the settlement back until the finger lifts.
///
/// The delegate is held weakly. Dropping the filter cancels its timer.
pub struct EventFilter<T: Clone + PartialEq + fmt::Debug + 'static> {
    shared: Rc<Shared<T>>,
}

/// Filter over the container bottom inset, in points
pub type BottomInsetFilter = EventFilter<f64>;

/// Filter over the raw keyboard end frame
pub type KeyboardFrameFilter = EventFilter<Rect>;

impl<T: Clone + PartialEq + fmt::Debug + 'static> EventFilter<T> {
    /// Create an idle filter that reports to `delegate`
    pub fn new(
        run_loop: RunLoop,
        configuration: FilterConfiguration,
        delegate: Weak<dyn FilterDelegate<T>>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(Slots {
                    configuration,
                    input: None,
                    output: None,
                    timer: None,
                }),
                delegate,
                run_loop,
            }),
        }
    }

    /// Assign a new raw value.
    ///
    /// A value different from the current input restarts the quiescence
    /// timer; an equal one is ignored.
    pub fn set_input(&self, value: T) {
        {
            let mut slots = self.shared.slots.borrow_mut();
            if slots.input.as_ref() == Some(&value) {
                trace!("Filter input unchanged at {:?}", value);
                return;
            }
            trace!("Filter input {:?} -> {:?}", slots.input, value);
            slots.input = Some(value);
        }
        self.start_timer();
    }

    /// Most recently assigned raw value
    pub fn input(&self) -> Option<T> {
        self.shared.slots.borrow().input.clone()
    }

    /// Most recently settled value
    pub fn output(&self) -> Option<T> {
        self.shared.slots.borrow().output.clone()
    }

    /// Whether a settlement is outstanding
    pub fn state(&self) -> FilterState {
        if self.shared.slots.borrow().timer.is_some() {
            FilterState::Pending
        } else {
            FilterState::Idle
        }
    }

    /// Current tunables
    pub fn configuration(&self) -> FilterConfiguration {
        self.shared.slots.borrow().configuration
    }

    /// Change the quiescence window. Applies from the next input change; a
    /// timer already running keeps its deadline.
    ///
    /// A window too long to put on the clock never elapses: the input then
    /// settles only through [`flush`](Self::flush).
    pub fn set_delay(&self, delay: Duration) {
        self.shared.slots.borrow_mut().configuration.delay = delay;
    }

    /// Drop the pending timer, if any, without settling
    pub fn cancel(&self) {
        let timer = self.shared.slots.borrow_mut().timer.take();
        if let Some(id) = timer {
            self.shared.run_loop.cancel(id);
            trace!("Filter timer {:?} cancelled", id);
        }
    }

    /// Settle the pending input right now instead of waiting for the timer.
    /// Does nothing when idle.
    pub fn flush(&self) {
        let timer = self.shared.slots.borrow().timer;
        if let Some(id) = timer {
            if !self.shared.run_loop.fire(id) {
                // Timer vanished from the loop underneath us; settle by hand.
                self.shared.settle();
            }
        }
    }

    fn start_timer(&self) {
        self.cancel();

        let delay = self.shared.slots.borrow().configuration.delay;
        let weak = Rc::downgrade(&self.shared);
        let id = self
            .shared
            .run_loop
            .schedule(delay, RunLoopMode::Common, move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                shared.settle();
            });

        self.shared.slots.borrow_mut().timer = Some(id);
        trace!("Filter timer {:?} scheduled in {:?}", id, delay);
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> Drop for EventFilter<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for EventFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.shared.slots.borrow();
        f.debug_struct("EventFilter")
            .field("delay", &slots.configuration.delay)
            .field("input", &slots.input)
            .field("output", &slots.output)
            .field("pending", &slots.timer.is_some())
            .finish()
    }
}
