//! Configuration data models
//!
//! This module defines the data structures used for configuration.

use crate::error::{InsetError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest quiescence window accepted from a config file
pub const MAX_FILTER_DELAY_MS: u64 = 5_000;

/// Longest inset animation accepted from a config file
pub const MAX_ANIMATION_DURATION_MS: u64 = 10_000;

/// How a container applies the keyboard inset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentBehavior {
    /// Leave the container alone
    None,
    /// Grow the additional safe-area bottom inset and the embedded content's
    /// height constraint by the inset
    #[default]
    AdjustScrollView,
    /// Grow only the additional safe-area bottom inset, so the embedded
    /// content shrinks to the visible area
    AdjustScrollViewAndEmbeddedView,
}

/// Quiescence filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPreferences {
    /// Quiescence window in milliseconds (0-5000)
    pub delay_ms: u64,
}

/// Inset transition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationPreferences {
    /// Transition length in milliseconds (0-10000)
    pub duration_ms: u64,
    /// Spring damping ratio; 1.0 is critically damped
    pub damping_ratio: f64,
    /// Initial spring velocity, in transition lengths per second
    pub initial_velocity: f64,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetConfig {
    /// Quiescence filter settings
    pub filter: FilterPreferences,
    /// Inset transition settings
    pub animation: AnimationPreferences,
    /// How the container applies the inset
    pub adjustment_behavior: AdjustmentBehavior,
}

impl Default for FilterPreferences {
    fn default() -> Self {
        Self { delay_ms: 150 }
    }
}

impl Default for AnimationPreferences {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            damping_ratio: 1.0,
            initial_velocity: 0.0,
        }
    }
}

impl FilterPreferences {
    /// Quiescence window as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl AnimationPreferences {
    /// Transition length as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl InsetConfig {
    /// Reject values the filter or the animation can't work with
    pub fn validate(&self) -> Result<()> {
        if self.filter.delay_ms > MAX_FILTER_DELAY_MS {
            return Err(InsetError::InvalidConfig(format!(
                "filter.delay_ms must be at most {MAX_FILTER_DELAY_MS}, got {}",
                self.filter.delay_ms
            )));
        }
        if self.animation.duration_ms > MAX_ANIMATION_DURATION_MS {
            return Err(InsetError::InvalidConfig(format!(
                "animation.duration_ms must be at most {MAX_ANIMATION_DURATION_MS}, got {}",
                self.animation.duration_ms
            )));
        }
        if !self.animation.damping_ratio.is_finite() || self.animation.damping_ratio <= 0.0 {
            return Err(InsetError::InvalidConfig(format!(
                "animation.damping_ratio must be a positive number, got {}",
                self.animation.damping_ratio
            )));
        }
        if !self.animation.initial_velocity.is_finite() {
            return Err(InsetError::InvalidConfig(
                "animation.initial_velocity must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InsetConfig::default();
        assert_eq!(config.filter.delay(), Duration::from_millis(150));
        assert_eq!(config.animation.duration(), Duration::from_millis(500));
        assert_eq!(config.animation.damping_ratio, 1.0);
        assert_eq!(config.adjustment_behavior, AdjustmentBehavior::AdjustScrollView);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_behavior_serializes_camel_case() {
        let json = serde_json::to_string(&AdjustmentBehavior::AdjustScrollViewAndEmbeddedView)
            .unwrap();
        assert_eq!(json, "\"adjustScrollViewAndEmbeddedView\"");
        let none: AdjustmentBehavior = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(none, AdjustmentBehavior::None);
    }

    #[test]
    fn test_partial_document_takes_defaults() {
        let config: InsetConfig = serde_json::from_str(r#"{"filter":{"delay_ms":80}}"#).unwrap();
        assert_eq!(config.filter.delay_ms, 80);
        assert_eq!(config.animation.duration_ms, 500);
        assert_eq!(config.adjustment_behavior, AdjustmentBehavior::AdjustScrollView);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = InsetConfig::default();
        config.filter.delay_ms = MAX_FILTER_DELAY_MS + 1;
        assert!(matches!(config.validate(), Err(InsetError::InvalidConfig(_))));

        let mut config = InsetConfig::default();
        config.animation.damping_ratio = 0.0;
        assert!(matches!(config.validate(), Err(InsetError::InvalidConfig(_))));

        let mut config = InsetConfig::default();
        config.animation.initial_velocity = f64::NAN;
        assert!(matches!(config.validate(), Err(InsetError::InvalidConfig(_))));
    }
}
