//! Perception worker thread
//!
//! Owns frame intake and the gesture recognizer. Runs on a dedicated
//! thread so estimation and classification never block the caller, and
//! handles frames and control commands strictly in arrival order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::config::GestureConfig;
use crate::error::EngineError;
use crate::events::{GestureEvent, RecognitionError};
use crate::gesture::HandGestureRecognizer;

use super::estimator::{Frame, PoseEstimator};
use super::extract::FrameIntake;

/// Frames allowed between submission and completion: one being processed
/// and one waiting behind it
const MAX_PENDING_FRAMES: usize = 2;

/// Messages accepted by the perception worker
#[derive(Debug)]
pub enum WorkerCommand {
    /// Process one camera frame
    Frame(Frame),
    /// Start or stop forwarding detections to the recognizer. Turning
    /// recognition back on resets the recognizer first.
    SetEnabled(bool),
    /// Return the recognizer to Idle
    Reset,
    /// Stop the worker thread
    Shutdown,
}

/// Handle to the perception worker thread
pub struct PerceptionWorker {
    commands: std_mpsc::Sender<WorkerCommand>,
    pending_frames: Arc<AtomicUsize>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PerceptionWorker {
    /// Spawn the worker with recognition enabled.
    ///
    /// Control commands are never refused while the worker runs. Frames
    /// are dropped rather than queued once [`MAX_PENDING_FRAMES`] are
    /// outstanding.
    pub fn spawn(
        config: GestureConfig,
        estimator: Box<dyn PoseEstimator>,
        event_tx: mpsc::UnboundedSender<GestureEvent>,
    ) -> Result<Self, EngineError> {
        let (commands, command_rx) = std_mpsc::channel();
        let pending_frames = Arc::new(AtomicUsize::new(0));

        let intake = FrameIntake::new(estimator, &config);
        let recognizer = HandGestureRecognizer::new(config, event_tx.clone());
        let worker = Worker {
            intake,
            recognizer,
            event_tx,
            enabled: true,
            pending_frames: Arc::clone(&pending_frames),
        };

        let handle = thread::Builder::new()
            .name("gesture-perception".to_string())
            .spawn(move || {
                info!("perception worker started");
                worker.run(command_rx);
                info!("perception worker stopped");
            })
            .map_err(|e| EngineError::WorkerSpawn(e.to_string()))?;

        Ok(Self {
            commands,
            pending_frames,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Offer a frame. Returns false if the worker is busy or gone.
    pub fn submit_frame(&self, frame: Frame) -> bool {
        let reserved = self
            .pending_frames
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < MAX_PENDING_FRAMES).then_some(n + 1)
            })
            .is_ok();
        if !reserved {
            trace!(sequence = frame.sequence, "worker busy, dropping frame");
            return false;
        }

        match self.commands.send(WorkerCommand::Frame(frame)) {
            Ok(()) => true,
            Err(_) => {
                self.pending_frames.fetch_sub(1, Ordering::SeqCst);
                warn!("perception worker has stopped, dropping frame");
                false
            }
        }
    }

    /// Queue a command without waiting for frame processing. A frame sent
    /// this way bypasses the busy check but still counts as pending.
    pub fn send(&self, command: WorkerCommand) -> Result<(), EngineError> {
        let is_frame = matches!(command, WorkerCommand::Frame(_));
        if is_frame {
            self.pending_frames.fetch_add(1, Ordering::SeqCst);
        }
        self.commands.send(command).map_err(|_| {
            if is_frame {
                self.pending_frames.fetch_sub(1, Ordering::SeqCst);
            }
            EngineError::WorkerStopped
        })
    }

    /// Stop the worker and wait for it to exit. Idempotent; blocks.
    pub fn shutdown(&self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);

        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("perception worker panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        match self.handle.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|h| !h.is_finished()),
            Err(_) => false,
        }
    }
}

/// State owned by the worker thread
struct Worker {
    intake: FrameIntake,
    recognizer: HandGestureRecognizer,
    event_tx: mpsc::UnboundedSender<GestureEvent>,
    /// Whether detections reach the recognizer; only this thread flips it
    enabled: bool,
    pending_frames: Arc<AtomicUsize>,
}

impl Worker {
    /// Wait for a command or the next timer deadline
    fn run(mut self, commands: std_mpsc::Receiver<WorkerCommand>) {
        loop {
            // Timers only run while recognition is enabled
            let deadline = if self.enabled {
                self.recognizer.next_timer_deadline()
            } else {
                None
            };

            let command = match deadline {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match commands.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(WorkerCommand::Frame(frame)) => {
                    self.process_frame(&frame);
                    self.pending_frames.fetch_sub(1, Ordering::SeqCst);
                }
                Some(WorkerCommand::SetEnabled(enabled)) => self.set_enabled(enabled),
                Some(WorkerCommand::Reset) => self.recognizer.reset(Instant::now()),
                Some(WorkerCommand::Shutdown) => {
                    debug!("shutdown requested");
                    break;
                }
                None => {}
            }

            if self.enabled {
                self.recognizer.poll_timers(Instant::now());
            }
        }

        self.recognizer.reset(Instant::now());
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            // Nothing from before the pause may count toward a gesture
            self.recognizer.reset(Instant::now());
        }
        debug!(enabled, "recognition forwarding updated");
        self.enabled = enabled;
    }

    fn process_frame(&mut self, frame: &Frame) {
        match self.intake.process_frame(frame) {
            Ok(hands) => {
                let _ = self.event_tx.send(GestureEvent::HandsDetected {
                    hands: hands.clone(),
                });
                if self.enabled {
                    self.recognizer.process_detections(&hands, Instant::now());
                }
            }
            Err(e) => {
                warn!(sequence = frame.sequence, error = %e, "hand pose estimation failed");
                let _ = self.event_tx.send(GestureEvent::RecognitionFailed {
                    error: RecognitionError::SystemError(e.to_string()),
                });
            }
        }
    }
}
