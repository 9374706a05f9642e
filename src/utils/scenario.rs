//! Scripted host-event scenarios
//!
//! A scenario is a list of host events stamped with the time, in milliseconds
//! from the start, at which the host would report them. A player thread feeds
//! them into the run loop's channel on that schedule.

use crate::coordinator::{HostEvent, KeyboardNotification};
use crate::error::{InsetError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::SyncSender;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Bound of the channel between the scenario player and the run loop
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A host event and when it happens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Milliseconds from the start of the scenario
    pub at_ms: u64,
    /// Event to deliver
    pub event: HostEvent,
}

impl ScriptedEvent {
    fn new(at_ms: u64, event: HostEvent) -> Self {
        Self { at_ms, event }
    }
}

/// Focus hops through a three-field sign-up form, then an interactive
/// keyboard dismissal.
///
/// Heights mimic a phone keyboard with and without the predictive bar and an
/// autofill accessory.
pub fn sign_up_scenario() -> Vec<ScriptedEvent> {
    let show = |height| HostEvent::Keyboard(KeyboardNotification::will_show(390.0, height));
    let hide = HostEvent::Keyboard(KeyboardNotification::will_hide());

    vec![
        // Name field gains focus
        ScriptedEvent::new(0, show(336.0)),
        // Tap on email: the platform hides, then shows twice while the
        // predictive bar comes and goes
        ScriptedEvent::new(1200, hide),
        ScriptedEvent::new(1230, show(291.0)),
        ScriptedEvent::new(1260, show(336.0)),
        // Return moves to the password field with an autofill accessory
        ScriptedEvent::new(2500, show(380.0)),
        ScriptedEvent::new(2560, show(336.0)),
        // Drag the keyboard down while scrolling
        ScriptedEvent::new(4000, HostEvent::DragBegan),
        ScriptedEvent::new(4050, show(250.0)),
        ScriptedEvent::new(4150, show(120.0)),
        ScriptedEvent::new(4250, hide),
        ScriptedEvent::new(4900, HostEvent::DragEnded),
        ScriptedEvent::new(5400, HostEvent::Shutdown),
    ]
}

/// Read a scenario from a JSON array of [`ScriptedEvent`]s
pub fn load_scenario(path: &Path) -> Result<Vec<ScriptedEvent>> {
    let json = std::fs::read_to_string(path)?;
    let events: Vec<ScriptedEvent> = serde_json::from_str(&json)?;
    validate_scenario(&events)?;
    info!("Loaded {} scripted event(s) from {}", events.len(), path.display());
    Ok(events)
}

fn validate_scenario(events: &[ScriptedEvent]) -> Result<()> {
    if events.is_empty() {
        return Err(InsetError::ScenarioError("scenario has no events".to_string()));
    }
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(InsetError::ScenarioError(format!(
                "event {} at {}ms comes before the previous event at {}ms",
                index + 1,
                pair[1].at_ms,
                pair[0].at_ms
            )));
        }
    }
    if !events.iter().any(|e| e.event == HostEvent::Shutdown) {
        warn!("Scenario has no shutdown event; the run loop ends when the player finishes");
    }
    Ok(())
}

/// Send `events` to `sender` on their schedule from a background thread.
///
/// The thread stops early if the receiving side goes away. A full channel
/// holds the player back until the run loop catches up.
pub fn spawn_player(events: Vec<ScriptedEvent>, sender: SyncSender<HostEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let start = Instant::now();
        for scripted in events {
            let due = start + Duration::from_millis(scripted.at_ms);
            if let Some(wait) = due.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
            debug!("Playing {:?} at {}ms", scripted.event, scripted.at_ms);
            if sender.send(scripted.event).is_err() {
                debug!("Run loop is gone; player stopping");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_sign_up_scenario_is_valid() {
        let events = sign_up_scenario();
        assert!(validate_scenario(&events).is_ok());
        assert_eq!(events.last().map(|e| e.event), Some(HostEvent::Shutdown));
    }

    #[test]
    fn test_out_of_order_scenario_is_rejected() {
        let events = vec![
            ScriptedEvent::new(100, HostEvent::DragBegan),
            ScriptedEvent::new(50, HostEvent::DragEnded),
        ];
        assert!(matches!(
            validate_scenario(&events),
            Err(InsetError::ScenarioError(_))
        ));
        assert!(validate_scenario(&[]).is_err());
    }

    #[test]
    fn test_load_scenario_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(
            &path,
            r#"[
                {"at_ms": 0, "event": {"type": "keyboard", "kind": "will_hide"}},
                {"at_ms": 10, "event": {"type": "shutdown"}}
            ]"#,
        )
        .unwrap();

        let events = load_scenario(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event, HostEvent::Shutdown);
    }

    #[test]
    fn test_player_stops_when_loop_is_gone() {
        let (tx, rx) = mpsc::sync_channel(1);
        drop(rx);
        let events = vec![
            ScriptedEvent::new(0, HostEvent::DragBegan),
            ScriptedEvent::new(0, HostEvent::DragEnded),
            ScriptedEvent::new(0, HostEvent::Shutdown),
        ];
        assert!(spawn_player(events, tx).join().is_ok());
    }

    #[test]
    fn test_player_delivers_in_order() {
        let (tx, rx) = mpsc::sync_channel(EVENT_CHANNEL_CAPACITY);
        let events = vec![
            ScriptedEvent::new(0, HostEvent::DragBegan),
            ScriptedEvent::new(5, HostEvent::DragEnded),
            ScriptedEvent::new(10, HostEvent::Shutdown),
        ];
        spawn_player(events, tx).join().unwrap();

        let received: Vec<HostEvent> = rx.iter().collect();
        assert_eq!(
            received,
            vec![HostEvent::DragBegan, HostEvent::DragEnded, HostEvent::Shutdown]
        );
    }
}
