//! Temporal filter module
//!
//! Turns a noisy stream of values into one value per burst.
//!
//! # Overview
//!
//! ```text
//! set_input(a) set_input(b) set_input(c)      (quiet for `delay`)
//!      │            │            │                    │
//!   Idle ──► Pending ──► Pending ──► Pending ─────────┴──► Idle, output = c
//! ```
//!
//! - **Input slot**: written on every raw change, compared for equality
//! - **Output slot**: written only when the quiescence timer fires
//! - **Delegate**: one weakly-held subscriber told about each settlement
//!
//! `flush()` settles a pending value right away; `cancel()` throws it away.

pub mod event_filter;

pub use event_filter::{
    BottomInsetFilter, DEFAULT_DELAY, EventFilter, FilterConfiguration, FilterDelegate,
    FilterState, KeyboardFrameFilter,
};
