//! Run loop module
//!
//! A cooperative, single-threaded event loop that owns every timer in the
//! crate.
//!
//! # Modes
//!
//! The loop runs in one of two modes:
//!
//! - `Default`: nothing is being tracked
//! - `Tracking`: a scroll or drag gesture is in progress
//!
//! Timers are registered for `Default`, `Tracking` or `Common`. A `Common` timer
//! fires in both running modes; the others fire only in their own. Timers that
//! must keep firing while the user drags (the inset filter's quiescence timer
//! is one) are registered for `Common`.
//!
//! # Event Flow
//!
//! ```text
//! host thread ── HostEvent ──► mpsc ──► RunLoop::run ──► handler
//!                                           │
//!                                           └── due timers ──► callbacks
//! ```

pub mod clock;
pub mod run_loop;

pub use clock::{Clock, ManualClock, SystemClock};
pub use run_loop::{RunLoop, RunLoopMode, TimerId};
