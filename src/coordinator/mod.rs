//! Keyboard inset coordination module
//!
//! This module turns keyboard notifications into an animated bottom inset on a
//! scrollable container.
//!
//! # Overview
//!
//! The coordinator:
//! - **Listens** for keyboard will-show and will-hide notifications
//! - **Measures** how much of the keyboard covers the container's view
//! - **Filters** the measurements so a burst of notifications commits once
//! - **Applies** the settled inset inside a critically damped spring animation
//!
//! # Event Flow
//!
//! ```text
//! NotificationCenter → InsetCoordinator → BottomInsetFilter
//!                                                 ↓ (quiet for 150ms)
//!                        ContainerHost::animate ← settled inset
//! ```
//!
//! # Measuring the Overlap
//!
//! 1. Re-anchor the keyboard frame to the bottom of the window, keeping only its size
//! 2. Intersect it with the view's frame in window coordinates
//! 3. Take the intersection's height in the view's own coordinates
//! 4. Subtract the bottom safe area the platform already reserves
//! 5. Clamp at zero
//!
//! A hide notification always measures zero. A show notification without a
//! keyboard frame, or for a view outside any window, is ignored.
//!
//! # Applying the Inset
//!
//! The container picks an [`AdjustmentBehavior`](crate::config::AdjustmentBehavior):
//! - `None`: nothing changes
//! - `AdjustScrollView`: additional bottom safe-area inset and embedded height both grow
//! - `AdjustScrollViewAndEmbeddedView`: only the additional bottom safe-area inset grows

pub mod animation;
pub mod host;
pub mod inset_coordinator;
pub mod notifications;

pub use animation::SpringAnimation;
pub use host::ContainerHost;
pub use inset_coordinator::{InsetCoordinator, overlapping_bottom_inset};
pub use notifications::{
    HostEvent, KeyboardNotification, KeyboardNotificationKind, KeyboardObserver,
    NotificationCenter, SubscriptionId, dispatch_host_event,
};
