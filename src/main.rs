//! cookstep-gestures: replay driver for the gesture engine
//!
//! Plays a recorded hand-pose session through the engine at its original
//! pace and prints every recognizer event as a JSON line on stdout:
//! - Frames are throttled the way a live camera session would be
//! - Estimator failures in the recording surface as error events
//! - Ctrl-C or SIGTERM stops playback early

mod lifecycle;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use cookstep_gestures::config::Config;
use cookstep_gestures::intake::{Frame, FrameThrottle};
use cookstep_gestures::replay::Recording;
use cookstep_gestures::{GestureEngine, GestureEvent};

use crate::lifecycle::ShutdownSignal;

/// Time allowed for hover timers and trailing events after the last frame
const SETTLE_TIME: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the event stream
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "cookstep-gestures starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(?config.recording_path, "configuration loaded");

    let recording = Recording::load(&config.recording_path)
        .context("failed to load recording")?;

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    let mut engine = GestureEngine::start(config.gesture.clone(), recording.estimator())?;
    let printer = tokio::spawn(print_events(engine.subscribe()));

    info!("engine initialized, starting playback");

    tokio::select! {
        _ = play(&engine, &recording, config.gesture.frame_rate_limit) => {
            tokio::time::sleep(SETTLE_TIME).await;
        }

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Cleanup
    info!("shutting down...");

    engine.shutdown().await;
    drop(engine);

    if let Err(e) = printer.await {
        error!(?e, "event printer failed");
    }

    info!("cookstep-gestures stopped");

    Ok(())
}

/// Feed recorded frames to the engine at their recorded offsets
async fn play(engine: &GestureEngine, recording: &Recording, frame_rate_limit: f32) {
    let start = Instant::now();
    let mut throttle = FrameThrottle::new(frame_rate_limit);
    let mut forwarded = 0usize;
    let mut dropped = 0usize;

    for (sequence, recorded) in recording.frames().iter().enumerate() {
        tokio::time::sleep_until(start + recorded.offset()).await;

        if !throttle.admit(std::time::Instant::now()) {
            continue;
        }
        if engine.submit_frame(Frame::empty(sequence as u64)) {
            forwarded += 1;
        } else {
            dropped += 1;
        }
    }

    info!(
        total = recording.len(),
        forwarded,
        dropped,
        "recording finished"
    );
}

/// Print events as JSON lines until the engine goes away
async fn print_events(mut events: broadcast::Receiver<GestureEvent>) {
    loop {
        match events.recv().await {
            Ok(GestureEvent::HandsDetected { hands }) => {
                debug!(count = hands.len(), "hands detected");
            }
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(?e, %event, "failed to encode event"),
            },
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                break;
            }
        }
    }
}
