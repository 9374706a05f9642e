//! Seam between the coordinator and the container it adjusts

use crate::config::AdjustmentBehavior;
use crate::coordinator::animation::SpringAnimation;
use crate::geometry::{EdgeInsets, Rect};

/// The scrollable container whose layout follows the keyboard
///
/// Implementations use interior mutability: the coordinator only ever holds a
/// weak reference and calls through `&self`.
pub trait ContainerHost {
    /// Bounds of the window the container's view is attached to, or `None`
    /// while the view is not in a window.
    fn window_bounds(&self) -> Option<Rect>;

    /// Frame of the container's view converted into window coordinates
    fn view_frame_in_window(&self) -> Rect;

    /// Safe-area insets of the container's view, including any additional
    /// insets applied to it
    fn safe_area_insets(&self) -> EdgeInsets;

    /// Additional safe-area insets currently applied to the container
    fn additional_safe_area_insets(&self) -> EdgeInsets;

    /// Set the bottom edge of the additional safe-area insets
    fn set_additional_bottom_inset(&self, bottom: f64);

    /// Constant of the embedded content's height constraint, or `None` if the
    /// container has no embedded content yet
    fn embedded_height_constant(&self) -> Option<f64>;

    /// Set the embedded content's height constraint constant
    fn set_embedded_height_constant(&self, constant: f64);

    /// How the container wants the inset applied
    fn adjustment_behavior(&self) -> AdjustmentBehavior;

    /// Lay out the embedded content now, outside any animation
    fn layout_embedded_without_animation(&self);

    /// Lay out the container's view now if anything is pending
    fn layout_if_needed(&self);

    /// Run `changes` as one animated transition described by `animation`
    fn animate(&self, animation: &SpringAnimation, changes: &mut dyn FnMut());
}
