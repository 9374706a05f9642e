//! Keyboard notifications and host event routing

use crate::geometry::Rect;
use crate::runloop::{RunLoop, RunLoopMode};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Which keyboard transition a notification announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardNotificationKind {
    /// The keyboard is about to appear or change size
    WillShow,
    /// The keyboard is about to disappear
    WillHide,
}

/// A raw keyboard notification from the platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyboardNotification {
    /// Transition being announced
    pub kind: KeyboardNotificationKind,
    /// Keyboard frame at the end of the transition, in screen coordinates.
    /// Only its size is meaningful.
    #[serde(default)]
    pub end_frame: Option<Rect>,
}

impl KeyboardNotification {
    /// A show notification whose keyboard ends up `height` points tall
    pub fn will_show(width: f64, height: f64) -> Self {
        Self {
            kind: KeyboardNotificationKind::WillShow,
            end_frame: Some(Rect::new(0.0, 0.0, width, height)),
        }
    }

    /// A hide notification
    pub fn will_hide() -> Self {
        Self {
            kind: KeyboardNotificationKind::WillHide,
            end_frame: None,
        }
    }
}

/// Something that wants to hear about keyboard notifications
pub trait KeyboardObserver {
    /// Called for every posted notification of a kind the observer registered for
    fn keyboard_will_change(&self, notification: &KeyboardNotification);
}

/// Handle returned by [`NotificationCenter::add_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: SubscriptionId,
    kind: KeyboardNotificationKind,
    observer: Weak<dyn KeyboardObserver>,
}

#[derive(Default)]
struct Registry {
    registrations: Vec<Registration>,
    next_id: u64,
}

/// Delivers keyboard notifications to weakly-held observers
///
/// Cloning yields another handle to the same center.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    registry: Rc<RefCell<Registry>>,
}

impl NotificationCenter {
    /// Create an empty notification center
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` for notifications of `kind`
    pub fn add_observer(
        &self,
        kind: KeyboardNotificationKind,
        observer: Weak<dyn KeyboardObserver>,
    ) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.registrations.push(Registration { id, kind, observer });
        trace!("Observer {:?} registered for {:?}", id, kind);
        id
    }

    /// Unregister a subscription. Returns `false` if it was already gone.
    pub fn remove_observer(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.registrations.len();
        registry.registrations.retain(|r| r.id != id);
        registry.registrations.len() != before
    }

    /// Number of live registrations
    pub fn observer_count(&self) -> usize {
        let mut registry = self.registry.borrow_mut();
        registry
            .registrations
            .retain(|r| r.observer.strong_count() > 0);
        registry.registrations.len()
    }

    /// Deliver `notification` to every live observer registered for its kind,
    /// in registration order. Returns how many observers were called.
    pub fn post(&self, notification: &KeyboardNotification) -> usize {
        let observers: Vec<Rc<dyn KeyboardObserver>> = {
            let mut registry = self.registry.borrow_mut();
            registry
                .registrations
                .retain(|r| r.observer.strong_count() > 0);
            registry
                .registrations
                .iter()
                .filter(|r| r.kind == notification.kind)
                .filter_map(|r| r.observer.upgrade())
                .collect()
        };

        // Registry borrow is released so observers may (un)subscribe.
        for observer in &observers {
            observer.keyboard_will_change(notification);
        }
        observers.len()
    }
}

/// Something the host platform reports to the run loop thread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A keyboard notification to post
    Keyboard(KeyboardNotification),
    /// An interactive scroll or drag began
    DragBegan,
    /// The interactive scroll or drag ended
    DragEnded,
    /// Stop the run loop
    Shutdown,
}

/// Route one host event: keyboard notifications go to `center`, drags switch
/// the loop between `Default` and `Tracking`.
pub fn dispatch_host_event(
    run_loop: &RunLoop,
    center: &NotificationCenter,
    event: HostEvent,
) -> ControlFlow<()> {
    match event {
        HostEvent::Keyboard(notification) => {
            let delivered = center.post(&notification);
            trace!("{:?} delivered to {} observer(s)", notification.kind, delivered);
        }
        HostEvent::DragBegan => run_loop.set_mode(RunLoopMode::Tracking),
        HostEvent::DragEnded => run_loop.set_mode(RunLoopMode::Default),
        HostEvent::Shutdown => {
            debug!("Shutdown requested by host");
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
