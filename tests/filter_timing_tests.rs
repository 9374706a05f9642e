//! Timing tests for the quiescence filter and the inset coordinator
//!
//! Every test drives a `RunLoop` on a `ManualClock`, so timer deadlines are
//! exact and nothing sleeps.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use keyboard_inset::{
    config::{AdjustmentBehavior, InsetConfig},
    container::{PHONE_WINDOW, SimulatedContainer},
    coordinator::{
        HostEvent, InsetCoordinator, KeyboardNotification, NotificationCenter, dispatch_host_event,
    },
    filter::{EventFilter, FilterConfiguration, FilterDelegate, FilterState},
    geometry::Rect,
    runloop::{ManualClock, RunLoop, RunLoopMode},
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(150);

#[derive(Default)]
struct Settlements {
    values: RefCell<Vec<f64>>,
}

impl FilterDelegate<f64> for Settlements {
    fn filter_did_settle(&self, value: &f64) {
        self.values.borrow_mut().push(*value);
    }
}

struct Harness {
    clock: Rc<ManualClock>,
    run_loop: RunLoop,
    sink: Rc<Settlements>,
    filter: EventFilter<f64>,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(ManualClock::new());
        let run_loop = RunLoop::new(clock.clone());
        let sink = Rc::new(Settlements::default());
        let delegate: Weak<dyn FilterDelegate<f64>> = Rc::downgrade(&sink) as _;
        let filter = EventFilter::new(
            run_loop.clone(),
            FilterConfiguration { delay: DELAY },
            delegate,
        );
        Self {
            clock,
            run_loop,
            sink,
            filter,
        }
    }

    fn wait(&self, ms: u64) {
        self.run_loop.advance(&self.clock, Duration::from_millis(ms));
    }

    fn settled(&self) -> Vec<f64> {
        self.sink.values.borrow().clone()
    }
}

#[test]
fn test_burst_settles_once_with_last_value() {
    let h = Harness::new();
    for value in [100.0, 250.0, 0.0, 336.0] {
        h.filter.set_input(value);
        h.wait(40);
    }
    assert!(h.settled().is_empty());

    h.wait(200);
    assert_eq!(h.settled(), vec![336.0]);
    assert_eq!(h.filter.output(), Some(336.0));
    assert_eq!(h.filter.state(), FilterState::Idle);
}

#[test]
fn test_spaced_inputs_settle_independently() {
    let h = Harness::new();
    h.filter.set_input(291.0);
    h.wait(151);
    h.filter.set_input(336.0);
    h.wait(151);

    assert_eq!(h.settled(), vec![291.0, 336.0]);
}

#[test]
fn test_equal_input_does_not_restart_timer() {
    let h = Harness::new();
    h.filter.set_input(336.0);
    h.wait(100);
    h.filter.set_input(336.0);

    // Deadline is still 150ms after the first assignment
    h.wait(60);
    assert_eq!(h.settled(), vec![336.0]);
}

#[test]
fn test_flush_settles_immediately_and_only_once() {
    let h = Harness::new();
    h.filter.set_input(120.0);
    h.wait(10);
    h.filter.flush();
    assert_eq!(h.settled(), vec![120.0]);
    assert_eq!(h.filter.state(), FilterState::Idle);

    h.wait(500);
    assert_eq!(h.settled(), vec![120.0]);
}

#[test]
fn test_cancel_then_teardown_never_settles() {
    let h = Harness::new();
    h.filter.set_input(120.0);
    h.filter.cancel();
    let Harness {
        clock,
        run_loop,
        sink,
        filter,
    } = h;
    drop(filter);

    run_loop.advance(&clock, Duration::from_secs(1));
    assert!(sink.values.borrow().is_empty());
    assert_eq!(run_loop.pending_timers(), 0);
}

#[test]
fn test_teardown_with_pending_timer_never_settles() {
    let h = Harness::new();
    h.filter.set_input(120.0);
    let Harness {
        clock,
        run_loop,
        sink,
        filter,
    } = h;
    drop(filter);

    run_loop.advance(&clock, Duration::from_secs(1));
    assert!(sink.values.borrow().is_empty());
}

#[test]
fn test_filter_fires_while_tracking() {
    let h = Harness::new();
    h.run_loop.set_mode(RunLoopMode::Tracking);
    h.filter.set_input(250.0);
    h.wait(151);
    assert_eq!(h.settled(), vec![250.0]);
}

proptest! {
    #[test]
    fn prop_any_rapid_burst_settles_to_last(
        gaps in proptest::collection::vec(0u64..150, 1..20),
        heights in proptest::collection::vec(0.0f64..500.0, 20),
    ) {
        let h = Harness::new();
        let mut last = None;
        for (i, gap) in gaps.iter().enumerate() {
            let value = heights[i] + 1000.0 * i as f64;
            h.filter.set_input(value);
            last = Some(value);
            h.wait(*gap);
        }
        h.wait(150);

        prop_assert_eq!(h.settled().len(), 1);
        prop_assert_eq!(h.settled().last().copied(), last);
    }
}

struct Scene {
    clock: Rc<ManualClock>,
    run_loop: RunLoop,
    center: NotificationCenter,
    container: Rc<SimulatedContainer>,
    coordinator: InsetCoordinator<SimulatedContainer>,
}

impl Scene {
    fn new(container: SimulatedContainer) -> Self {
        let clock = Rc::new(ManualClock::new());
        let run_loop = RunLoop::new(clock.clone());
        let center = NotificationCenter::new();
        let container = Rc::new(container);
        let coordinator =
            InsetCoordinator::new(&container, &run_loop, &center, &InsetConfig::default());
        Self {
            clock,
            run_loop,
            center,
            container,
            coordinator,
        }
    }

    fn send(&self, event: HostEvent) {
        let _ = dispatch_host_event(&self.run_loop, &self.center, event);
    }

    fn wait(&self, ms: u64) {
        self.run_loop.advance(&self.clock, Duration::from_millis(ms));
    }
}

fn show(height: f64) -> HostEvent {
    HostEvent::Keyboard(KeyboardNotification::will_show(390.0, height))
}

fn hide() -> HostEvent {
    HostEvent::Keyboard(KeyboardNotification::will_hide())
}

#[test]
fn test_full_screen_view_insets_by_keyboard_height() {
    let scene = Scene::new(SimulatedContainer::new(PHONE_WINDOW));
    let notification = KeyboardNotification::will_show(390.0, 301.0);
    assert_eq!(scene.coordinator.candidate_inset(&notification), Some(301.0));
}

#[test]
fn test_raised_view_insets_by_covered_part() {
    let gap = 80.0;
    let frame = Rect::new(0.0, 0.0, PHONE_WINDOW.width(), PHONE_WINDOW.height() - gap);
    let scene = Scene::new(SimulatedContainer::new(PHONE_WINDOW).with_view_frame(frame));

    let covered = KeyboardNotification::will_show(390.0, 301.0);
    assert_eq!(scene.coordinator.candidate_inset(&covered), Some(301.0 - gap));

    let clear = KeyboardNotification::will_show(390.0, 60.0);
    assert_eq!(scene.coordinator.candidate_inset(&clear), Some(0.0));
}

#[test]
fn test_hide_is_zero_after_any_history() {
    let scene = Scene::new(SimulatedContainer::phone());
    scene.send(show(336.0));
    scene.wait(200);
    scene.send(show(380.0));

    assert_eq!(
        scene.coordinator.candidate_inset(&KeyboardNotification::will_hide()),
        Some(0.0)
    );
    scene.send(hide());
    scene.wait(200);
    assert_eq!(scene.container.additional_bottom_inset(), 0.0);
}

#[test]
fn test_focus_hop_burst_applies_one_animation() {
    let scene = Scene::new(SimulatedContainer::phone());
    scene.send(show(336.0));
    scene.wait(200);
    assert_eq!(scene.container.applied().len(), 1);

    // hide, then two shows while the predictive bar toggles
    scene.send(hide());
    scene.wait(30);
    scene.send(show(291.0));
    scene.wait(30);
    scene.send(show(336.0));
    scene.wait(200);

    // The burst ended where it began, so nothing visibly changes, but the
    // filter still reports one settlement for it
    let applied = scene.container.applied();
    assert_eq!(applied.len(), 2);
    assert!(applied.iter().all(|a| a.bottom_inset == 336.0 - 34.0));
}

#[test]
fn test_interactive_dismissal_settles_during_drag() {
    let scene = Scene::new(
        SimulatedContainer::phone()
            .with_behavior(AdjustmentBehavior::AdjustScrollViewAndEmbeddedView),
    );
    scene.send(show(336.0));
    scene.wait(200);

    scene.send(HostEvent::DragBegan);
    scene.send(show(120.0));
    scene.wait(30);
    scene.send(hide());
    scene.wait(200);

    assert_eq!(scene.run_loop.current_mode(), RunLoopMode::Tracking);
    assert_eq!(scene.container.additional_bottom_inset(), 0.0);
    assert_eq!(scene.container.embedded_height(), Some(0.0));
    scene.send(HostEvent::DragEnded);
}

#[test]
fn test_dropped_coordinator_stops_listening() {
    let Scene {
        clock,
        run_loop,
        center,
        container,
        coordinator,
    } = Scene::new(SimulatedContainer::phone());

    center.post(&KeyboardNotification::will_show(390.0, 336.0));
    drop(coordinator);
    assert_eq!(center.observer_count(), 0);

    run_loop.advance(&clock, Duration::from_secs(1));
    assert!(container.applied().is_empty());
}
