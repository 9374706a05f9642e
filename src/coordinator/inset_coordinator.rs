//! Inset coordinator implementation
//!
//! Listens for keyboard notifications, works out how much of the keyboard
//! covers the container, and commits that inset once the notifications settle.

use crate::config::{AdjustmentBehavior, InsetConfig};
use crate::coordinator::animation::SpringAnimation;
use crate::coordinator::host::ContainerHost;
use crate::coordinator::notifications::{
    KeyboardNotification, KeyboardNotificationKind, KeyboardObserver, NotificationCenter,
    SubscriptionId,
};
use crate::filter::{
    BottomInsetFilter, EventFilter, FilterConfiguration, FilterDelegate, FilterState,
};
use crate::geometry::Rect;
use crate::runloop::RunLoop;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, info};

/// Height of the part of the keyboard that covers the view, minus the bottom
/// safe area the platform already reserves, never negative.
///
/// Only the keyboard's size is used: its frame is re-anchored to the bottom of
/// the window because the reported origin can't be trusted mid-animation.
///
/// * `keyboard_end_frame` - keyboard frame from the notification
/// * `window_bounds` - bounds of the window hosting the view
/// * `view_frame_in_window` - the view's frame in window coordinates
/// * `safe_area_bottom` - the view's current bottom safe-area inset
/// * `additional_bottom` - bottom inset already added on top of the platform's
pub fn overlapping_bottom_inset(
    keyboard_end_frame: &Rect,
    window_bounds: &Rect,
    view_frame_in_window: &Rect,
    safe_area_bottom: f64,
    additional_bottom: f64,
) -> f64 {
    let keyboard_in_window = Rect::new(
        0.0,
        window_bounds.height() - keyboard_end_frame.height(),
        keyboard_end_frame.width(),
        keyboard_end_frame.height(),
    );

    let overlap_height = view_frame_in_window
        .intersection(&keyboard_in_window)
        .map(|overlap| view_frame_in_window.convert_to_local(&overlap))
        .map_or(0.0, |overlap| overlap.height());

    // The part of the safe area the platform provides on its own
    let platform_bottom = safe_area_bottom - additional_bottom;

    (overlap_height - platform_bottom).max(0.0)
}

struct Inner<H: ContainerHost + 'static> {
    container: Weak<H>,
    filter: BottomInsetFilter,
    animation: SpringAnimation,
}

impl<H: ContainerHost + 'static> Inner<H> {
    fn update_for_keyboard_visibility(&self, notification: &KeyboardNotification) {
        self.suppress_text_animation();

        match notification.kind {
            KeyboardNotificationKind::WillHide => self.filter.set_input(0.0),
            KeyboardNotificationKind::WillShow => {
                if let Some(inset) = self.candidate_inset(notification) {
                    self.filter.set_input(inset);
                }
                // Continues in filter_did_settle once the notifications go quiet
            }
        }
    }

    fn candidate_inset(&self, notification: &KeyboardNotification) -> Option<f64> {
        if notification.kind == KeyboardNotificationKind::WillHide {
            return Some(0.0);
        }
        let Some(end_frame) = notification.end_frame else {
            debug!("Keyboard notification has no end frame; keeping current inset");
            return None;
        };
        let container = self.container.upgrade()?;
        let Some(window_bounds) = container.window_bounds() else {
            debug!("Container view is not in a window; keeping current inset");
            return None;
        };

        Some(overlapping_bottom_inset(
            &end_frame,
            &window_bounds,
            &container.view_frame_in_window(),
            container.safe_area_insets().bottom,
            container.additional_safe_area_insets().bottom,
        ))
    }

    /// Text inside the newly focused field otherwise slides into place, because
    /// the platform posts keyboard notifications from inside its own animations.
    fn suppress_text_animation(&self) {
        if let Some(container) = self.container.upgrade() {
            container.layout_embedded_without_animation();
        }
    }

    fn apply_bottom_inset(container: &H, bottom_inset: f64) {
        if container.embedded_height_constant().is_none() {
            debug!("Container has no embedded content; inset not applied");
            return;
        }

        match container.adjustment_behavior() {
            AdjustmentBehavior::None => {}
            AdjustmentBehavior::AdjustScrollView => {
                container.set_additional_bottom_inset(bottom_inset);
                container.set_embedded_height_constant(bottom_inset);
            }
            AdjustmentBehavior::AdjustScrollViewAndEmbeddedView => {
                container.set_additional_bottom_inset(bottom_inset);
            }
        }
    }
}

impl<H: ContainerHost + 'static> FilterDelegate<f64> for Inner<H> {
    fn filter_did_settle(&self, bottom_inset: &f64) {
        let Some(container) = self.container.upgrade() else {
            debug!("Container is gone; settled inset dropped");
            return;
        };

        let bottom_inset = *bottom_inset;
        info!("Applying keyboard bottom inset {:.1}", bottom_inset);
        container.animate(&self.animation, &mut || {
            Self::apply_bottom_inset(&container, bottom_inset);
            container.layout_if_needed();
        });
    }
}

impl<H: ContainerHost + 'static> KeyboardObserver for Inner<H> {
    fn keyboard_will_change(&self, notification: &KeyboardNotification) {
        self.update_for_keyboard_visibility(notification);
    }
}

/// Keeps a container clear of the virtual keyboard
///
/// Registers for keyboard show and hide notifications on construction and
/// unregisters when dropped. The container is held weakly; dropping the
/// coordinator also cancels any settlement still pending.
pub struct InsetCoordinator<H: ContainerHost + 'static> {
    inner: Rc<Inner<H>>,
    center: NotificationCenter,
    subscriptions: [SubscriptionId; 2],
}

impl<H: ContainerHost + 'static> InsetCoordinator<H> {
    /// Start following keyboard notifications posted on `center` on behalf of
    /// `container`
    pub fn new(
        container: &Rc<H>,
        run_loop: &RunLoop,
        center: &NotificationCenter,
        config: &InsetConfig,
    ) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner<H>>| {
            let delegate: Weak<dyn FilterDelegate<f64>> = weak.clone();
            Inner {
                container: Rc::downgrade(container),
                filter: EventFilter::new(
                    run_loop.clone(),
                    FilterConfiguration {
                        delay: config.filter.delay(),
                    },
                    delegate,
                ),
                animation: SpringAnimation::from(&config.animation),
            }
        });

        let observer: Weak<dyn KeyboardObserver> = Rc::downgrade(&inner) as _;
        let subscriptions = [
            KeyboardNotificationKind::WillShow,
            KeyboardNotificationKind::WillHide,
        ]
        .map(|kind| center.add_observer(kind, observer.clone()));

        info!(
            "Inset coordinator started (filter delay {:?}, animation {:?})",
            config.filter.delay(),
            config.animation.duration()
        );

        Self {
            inner,
            center: center.clone(),
            subscriptions,
        }
    }

    /// Handle a notification directly, as if it had been posted
    pub fn handle_notification(&self, notification: &KeyboardNotification) {
        self.inner.update_for_keyboard_visibility(notification);
    }

    /// Inset `notification` would feed into the filter right now, or `None`
    /// when it can't be computed
    pub fn candidate_inset(&self, notification: &KeyboardNotification) -> Option<f64> {
        self.inner.candidate_inset(notification)
    }

    /// Last inset committed to the container
    pub fn settled_inset(&self) -> Option<f64> {
        self.inner.filter.output()
    }

    /// Inset waiting for the notifications to go quiet
    pub fn pending_inset(&self) -> Option<f64> {
        self.inner.filter.input()
    }

    /// Whether a settlement is outstanding
    pub fn filter_state(&self) -> FilterState {
        self.inner.filter.state()
    }

    /// Change the quiescence window
    pub fn set_filter_delay(&self, delay: Duration) {
        self.inner.filter.set_delay(delay);
    }

    /// Transition used when committing an inset
    pub fn animation(&self) -> SpringAnimation {
        self.inner.animation
    }

    /// Commit the pending inset now
    pub fn flush(&self) {
        self.inner.filter.flush();
    }

    /// Forget the pending inset
    pub fn cancel(&self) {
        self.inner.filter.cancel();
    }
}

impl<H: ContainerHost + 'static> Drop for InsetCoordinator<H> {
    fn drop(&mut self) {
        for id in self.subscriptions {
            self.center.remove_observer(id);
        }
        self.inner.filter.cancel();
        debug!("Inset coordinator stopped");
    }
}
