//! In-memory container for demos and tests
//!
//! `SimulatedContainer` behaves like a full-screen scroll view controller: its
//! safe area is the platform inset (a home indicator, say) plus whatever
//! additional inset has been applied, and it records every animated inset
//! change so callers can inspect what happened. Each change is also sampled
//! along its spring curve at display-frame rate, the way a host without native
//! spring animation would drive it.

use crate::config::AdjustmentBehavior;
use crate::coordinator::{ContainerHost, SpringAnimation};
use crate::geometry::{EdgeInsets, Rect};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Window of a 390x844pt phone in portrait
pub const PHONE_WINDOW: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

/// Bottom safe-area inset of a phone with a home indicator
pub const HOME_INDICATOR_INSET: f64 = 34.0;

/// Interval between sampled animation frames (60 Hz)
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// One animated inset change observed by a [`SimulatedContainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedInset {
    /// Transition the change was made in
    pub animation: SpringAnimation,
    /// Additional bottom inset after the change
    pub bottom_inset: f64,
    /// Embedded height constant after the change
    pub embedded_height: Option<f64>,
    /// Whether a layout pass ran inside the transition
    pub laid_out: bool,
    /// Additional bottom inset at each frame of the transition; the last
    /// frame is always `bottom_inset`
    pub frames: Vec<f64>,
}

/// Inset at every [`FRAME_INTERVAL`] of `animation` while moving from `from`
/// to `to`, ending exactly on `to`
fn sample_frames(animation: &SpringAnimation, from: f64, to: f64) -> Vec<f64> {
    let total = animation.delay + animation.duration;
    let count = total.as_nanos().div_ceil(FRAME_INTERVAL.as_nanos()).max(1);
    let mut frames: Vec<f64> = (1..count)
        .map(|frame| {
            let elapsed = FRAME_INTERVAL.saturating_mul(u32::try_from(frame).unwrap_or(u32::MAX));
            animation.interpolate(from, to, elapsed)
        })
        .collect();
    frames.push(to);
    frames
}

/// A [`ContainerHost`] that keeps its state in memory
#[derive(Debug)]
pub struct SimulatedContainer {
    window: Cell<Option<Rect>>,
    view_frame: Cell<Rect>,
    platform_safe_area: Cell<EdgeInsets>,
    additional: Cell<EdgeInsets>,
    embedded_height: Cell<Option<f64>>,
    behavior: Cell<AdjustmentBehavior>,
    layout_passes: Cell<usize>,
    unanimated_layout_passes: Cell<usize>,
    applied: RefCell<Vec<AppliedInset>>,
}

impl SimulatedContainer {
    /// A container filling `window`, with no platform safe area and an
    /// embedded height constraint at 0
    pub fn new(window: Rect) -> Self {
        Self {
            window: Cell::new(Some(window)),
            view_frame: Cell::new(window),
            platform_safe_area: Cell::new(EdgeInsets::ZERO),
            additional: Cell::new(EdgeInsets::ZERO),
            embedded_height: Cell::new(Some(0.0)),
            behavior: Cell::new(AdjustmentBehavior::default()),
            layout_passes: Cell::new(0),
            unanimated_layout_passes: Cell::new(0),
            applied: RefCell::new(Vec::new()),
        }
    }

    /// A full-screen container on a phone with a home indicator
    pub fn phone() -> Self {
        Self::new(PHONE_WINDOW).with_safe_area(EdgeInsets::bottom(HOME_INDICATOR_INSET))
    }

    /// Use `frame` (window coordinates) as the view frame
    #[must_use]
    pub fn with_view_frame(self, frame: Rect) -> Self {
        self.view_frame.set(frame);
        self
    }

    /// Use `insets` as the platform-provided safe area
    #[must_use]
    pub fn with_safe_area(self, insets: EdgeInsets) -> Self {
        self.platform_safe_area.set(insets);
        self
    }

    /// Use `behavior` for applying insets
    #[must_use]
    pub fn with_behavior(self, behavior: AdjustmentBehavior) -> Self {
        self.behavior.set(behavior);
        self
    }

    /// Remove the embedded height constraint
    #[must_use]
    pub fn without_embedded_content(self) -> Self {
        self.embedded_height.set(None);
        self
    }

    /// Start out of any window
    #[must_use]
    pub fn detached(self) -> Self {
        self.detach();
        self
    }

    /// Move the view into a window with `bounds`
    pub fn attach(&self, bounds: Rect) {
        self.window.set(Some(bounds));
    }

    /// Take the view out of its window
    pub fn detach(&self) {
        self.window.set(None);
    }

    /// Change the adjustment behavior
    pub fn set_behavior(&self, behavior: AdjustmentBehavior) {
        self.behavior.set(behavior);
    }

    /// Additional bottom inset currently applied
    pub fn additional_bottom_inset(&self) -> f64 {
        self.additional.get().bottom
    }

    /// Embedded height constraint constant
    pub fn embedded_height(&self) -> Option<f64> {
        self.embedded_height.get()
    }

    /// Every animated inset change so far, oldest first
    pub fn applied(&self) -> Vec<AppliedInset> {
        self.applied.borrow().clone()
    }

    /// Layout passes of the container's view
    pub fn layout_passes(&self) -> usize {
        self.layout_passes.get()
    }

    /// Layout passes of the embedded content made outside animations
    pub fn unanimated_layout_passes(&self) -> usize {
        self.unanimated_layout_passes.get()
    }
}

impl ContainerHost for SimulatedContainer {
    fn window_bounds(&self) -> Option<Rect> {
        self.window.get()
    }

    fn view_frame_in_window(&self) -> Rect {
        self.view_frame.get()
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        let platform = self.platform_safe_area.get();
        let additional = self.additional.get();
        EdgeInsets {
            top: platform.top + additional.top,
            left: platform.left + additional.left,
            bottom: platform.bottom + additional.bottom,
            right: platform.right + additional.right,
        }
    }

    fn additional_safe_area_insets(&self) -> EdgeInsets {
        self.additional.get()
    }

    fn set_additional_bottom_inset(&self, bottom: f64) {
        let mut additional = self.additional.get();
        additional.bottom = bottom;
        self.additional.set(additional);
    }

    fn embedded_height_constant(&self) -> Option<f64> {
        self.embedded_height.get()
    }

    fn set_embedded_height_constant(&self, constant: f64) {
        if self.embedded_height.get().is_some() {
            self.embedded_height.set(Some(constant));
        }
    }

    fn adjustment_behavior(&self) -> AdjustmentBehavior {
        self.behavior.get()
    }

    fn layout_embedded_without_animation(&self) {
        self.unanimated_layout_passes
            .set(self.unanimated_layout_passes.get() + 1);
    }

    fn layout_if_needed(&self) {
        self.layout_passes.set(self.layout_passes.get() + 1);
    }

    fn animate(&self, animation: &SpringAnimation, changes: &mut dyn FnMut()) {
        let passes_before = self.layout_passes.get();
        let inset_before = self.additional.get().bottom;
        changes();
        let bottom_inset = self.additional.get().bottom;
        self.applied.borrow_mut().push(AppliedInset {
            animation: *animation,
            bottom_inset,
            embedded_height: self.embedded_height.get(),
            laid_out: self.layout_passes.get() > passes_before,
            frames: sample_frames(animation, inset_before, bottom_inset),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_area_includes_additional_inset() {
        let container = SimulatedContainer::phone();
        assert_eq!(container.safe_area_insets().bottom, HOME_INDICATOR_INSET);

        container.set_additional_bottom_inset(300.0);
        assert_eq!(container.safe_area_insets().bottom, HOME_INDICATOR_INSET + 300.0);
        assert_eq!(container.additional_safe_area_insets().bottom, 300.0);
    }

    #[test]
    fn test_attach_and_detach() {
        let container = SimulatedContainer::new(PHONE_WINDOW).detached();
        assert_eq!(container.window_bounds(), None);
        container.attach(PHONE_WINDOW);
        assert_eq!(container.window_bounds(), Some(PHONE_WINDOW));
    }

    #[test]
    fn test_animate_records_change() {
        let container = SimulatedContainer::new(PHONE_WINDOW);
        container.animate(&SpringAnimation::default(), &mut || {
            container.set_additional_bottom_inset(120.0);
            container.layout_if_needed();
        });

        let applied = container.applied();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].bottom_inset, 120.0);
        assert!(applied[0].laid_out);
    }

    #[test]
    fn test_frames_follow_critically_damped_curve() {
        let container = SimulatedContainer::new(PHONE_WINDOW);
        container.animate(&SpringAnimation::default(), &mut || {
            container.set_additional_bottom_inset(300.0);
        });

        let applied = container.applied();
        let frames = &applied[0].frames;
        // 500ms at 60 Hz
        assert_eq!(frames.len(), 30);
        assert!(frames[0] > 0.0 && frames[0] < 300.0);
        assert!(frames.windows(2).all(|pair| pair[1] >= pair[0]));
        assert!(frames.iter().all(|&inset| inset <= 300.0));
        assert_eq!(frames.last().copied(), Some(300.0));
    }

    #[test]
    fn test_underdamped_frames_overshoot() {
        let container = SimulatedContainer::new(PHONE_WINDOW);
        container.set_additional_bottom_inset(300.0);
        let bouncy = SpringAnimation {
            damping_ratio: 0.3,
            ..SpringAnimation::default()
        };
        container.animate(&bouncy, &mut || container.set_additional_bottom_inset(0.0));

        let applied = container.applied();
        let frames = &applied[0].frames;
        assert!(frames.iter().any(|&inset| inset < 0.0));
        assert_eq!(frames.last().copied(), Some(0.0));
    }

    #[test]
    fn test_zero_duration_is_a_single_frame() {
        let container = SimulatedContainer::new(PHONE_WINDOW);
        let instant = SpringAnimation {
            duration: Duration::ZERO,
            ..SpringAnimation::default()
        };
        container.animate(&instant, &mut || container.set_additional_bottom_inset(80.0));
        assert_eq!(container.applied()[0].frames, vec![80.0]);
    }

    #[test]
    fn test_missing_constraint_stays_missing() {
        let container = SimulatedContainer::new(PHONE_WINDOW).without_embedded_content();
        container.set_embedded_height_constant(50.0);
        assert_eq!(container.embedded_height(), None);
    }
}
