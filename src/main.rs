//! `keyboard-inset-demo` - Replays keyboard notifications against a simulated
//! phone container and reports the insets it ends up applying.
//!
//! Usage: `keyboard-inset-demo [scenario.json] [--log-dir <dir>]`
//!
//! Without a scenario file a built-in sign-up form walkthrough is played.

use anyhow::{Context, Result, bail};
use keyboard_inset::{
    config::ConfigManager,
    container::SimulatedContainer,
    coordinator::{HostEvent, InsetCoordinator, NotificationCenter, dispatch_host_event},
    error::{InsetError, get_user_friendly_error},
    runloop::RunLoop,
    utils::{self, ScriptedEvent},
};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use tracing::{error, info};

#[derive(Debug, Default)]
struct Args {
    scenario: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args_os().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--log-dir" {
            let dir = iter.next().context("--log-dir needs a directory")?;
            args.log_dir = Some(PathBuf::from(dir));
        } else if args.scenario.is_none() {
            args.scenario = Some(PathBuf::from(arg));
        } else {
            bail!("Unexpected argument: {}", arg.to_string_lossy());
        }
    }
    Ok(args)
}

/// Main entry point for the demo
fn main() -> Result<()> {
    let args = parse_args()?;

    utils::init_logging(args.log_dir.as_deref())
        .context("Failed to initialize logging system")?;

    info!("keyboard-inset-demo v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        let message = match e.downcast_ref::<InsetError>() {
            Some(inset_error) => get_user_friendly_error(inset_error),
            None => format!("{e:#}"),
        };
        error!("Demo failed: {:#}", e);
        eprintln!("ERROR: {message}");
        return Err(e);
    }

    info!("keyboard-inset-demo shutting down");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = ConfigManager::load().context("Failed to load configuration")?;
    info!(
        "Configuration loaded (filter delay {}ms, behavior {:?})",
        config.filter.delay_ms, config.adjustment_behavior
    );

    let events: Vec<ScriptedEvent> = match &args.scenario {
        Some(path) => utils::load_scenario(path)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
        None => utils::sign_up_scenario(),
    };
    info!("Playing {} scripted event(s)", events.len());

    let container =
        Rc::new(SimulatedContainer::phone().with_behavior(config.adjustment_behavior));
    let run_loop = RunLoop::with_system_clock();
    let center = NotificationCenter::new();
    let coordinator = InsetCoordinator::new(&container, &run_loop, &center, &config);

    let (event_tx, event_rx) = mpsc::sync_channel::<HostEvent>(utils::EVENT_CHANNEL_CAPACITY);
    let player = utils::spawn_player(events, event_tx);

    run_loop.run(&event_rx, |event| dispatch_host_event(&run_loop, &center, event));

    // Commit whatever the last burst left pending
    coordinator.flush();
    drop(event_rx);
    if player.join().is_err() {
        bail!("Scenario player thread panicked");
    }

    println!("Applied insets:");
    for (index, applied) in container.applied().iter().enumerate() {
        let (low, high) = applied
            .frames
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &inset| {
                (low.min(inset), high.max(inset))
            });
        println!(
            "  {:>2}. bottom inset {:>6.1}  embedded height {:>8}  {} frames within [{:.1}, {:.1}]",
            index + 1,
            applied.bottom_inset,
            applied
                .embedded_height
                .map_or_else(|| "-".to_string(), |h| format!("{h:.1}")),
            applied.frames.len(),
            low,
            high,
        );
    }
    println!(
        "Final additional bottom inset: {:.1}",
        container.additional_bottom_inset()
    );

    Ok(())
}
