//! `keyboard-inset` - Keep scrollable content clear of the virtual keyboard
//!
//! Keyboard show and hide notifications arrive in bursts while focus moves
//! between text fields. An `InsetCoordinator` measures how much of the keyboard
//! covers its container, feeds that into a debouncing `EventFilter`, and
//! applies the inset once, in a single spring animation, after the burst goes
//! quiet.
//!
//! Everything runs on one thread around a `RunLoop`. Filter timers are
//! scheduled in the run loop's common modes so they still fire while the user
//! drags a scroll view.

// Module declarations
pub mod config;
pub mod container;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod runloop;
pub mod utils;

// Re-export commonly used types
pub use coordinator::{ContainerHost, InsetCoordinator, KeyboardNotification, NotificationCenter};
pub use error::{InsetError, Result};
pub use filter::{EventFilter, FilterDelegate};
pub use runloop::{RunLoop, RunLoopMode};
