//! Utility modules
//!
//! Provides logging setup and scripted host-event scenarios.

pub mod logging;
pub mod scenario;

pub use logging::init_logging;
pub use scenario::{
    EVENT_CHANNEL_CAPACITY, ScriptedEvent, load_scenario, sign_up_scenario, spawn_player,
};
