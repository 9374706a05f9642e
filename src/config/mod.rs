//! Configuration management module
//!
//! This module handles loading and saving the filter and animation settings.
//! Configuration is stored as JSON with atomic writes to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{AdjustmentBehavior, AnimationPreferences, FilterPreferences, InsetConfig};
