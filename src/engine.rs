//! Engine control surface
//!
//! Wires the perception worker to the dispatcher and exposes the controls
//! a camera session needs: submit frames, enable/disable recognition,
//! force a reset, read a snapshot and subscribe to events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::GestureConfig;
use crate::dispatch::{Dispatcher, GestureObserver, Snapshot};
use crate::error::EngineError;
use crate::events::GestureEvent;
use crate::intake::{Frame, PerceptionWorker, PoseEstimator, WorkerCommand};

/// Broadcast buffer for event subscribers
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Gesture engine for one camera session
pub struct GestureEngine {
    worker: Arc<PerceptionWorker>,
    dispatcher: Dispatcher,
    dispatch_task: Option<JoinHandle<()>>,
    /// Caller-facing flag; the worker applies changes in command order
    enabled: AtomicBool,
    stopped: bool,
}

impl GestureEngine {
    /// Start the engine. Must be called from within a tokio runtime; the
    /// dispatcher runs as a task on it.
    pub fn start<E>(config: GestureConfig, estimator: E) -> Result<Self, EngineError>
    where
        E: PoseEstimator + 'static,
    {
        config.validate()?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| EngineError::WorkerSpawn(format!("no tokio runtime: {e}")))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let worker = PerceptionWorker::spawn(config, Box::new(estimator), event_tx)?;

        let dispatcher = Dispatcher::new(EVENT_CHANNEL_CAPACITY);
        let dispatch_task = runtime.spawn(dispatcher.clone().run(event_rx));

        info!("gesture engine started");

        Ok(Self {
            worker: Arc::new(worker),
            dispatcher,
            dispatch_task: Some(dispatch_task),
            enabled: AtomicBool::new(true),
            stopped: false,
        })
    }

    /// Offer a camera frame. Returns false if it was dropped because the
    /// worker is still busy with an earlier frame.
    pub fn submit_frame(&self, frame: Frame) -> bool {
        self.worker.submit_frame(frame)
    }

    /// Enable or disable recognition.
    ///
    /// Disabling only stops forwarding detections. Re-enabling resets the
    /// recognizer before any later frame reaches it, so no hover or motion
    /// state from before the pause survives. Never waits for a frame in
    /// progress.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), EngineError> {
        self.ensure_running()?;
        let was_enabled = self.enabled.swap(enabled, Ordering::SeqCst);
        debug!(enabled, was_enabled, "recognition toggled");

        if enabled != was_enabled {
            if let Err(e) = self.worker.send(WorkerCommand::SetEnabled(enabled)) {
                self.enabled.store(was_enabled, Ordering::SeqCst);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Return the recognizer to Idle and cancel its timers
    pub fn reset(&self) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.worker.send(WorkerCommand::Reset)
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.stopped {
            return Err(EngineError::AlreadyShutDown);
        }
        Ok(())
    }

    /// Current published state
    pub async fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.dispatcher.snapshot().await;
        snapshot.enabled = self.is_enabled();
        snapshot
    }

    /// Subscribe to every event. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.dispatcher.subscribe()
    }

    /// Register an observer. The engine keeps only a weak reference; the
    /// owner must hold the `Arc` for as long as it wants notifications.
    pub fn add_observer(&self, observer: Weak<dyn GestureObserver>) {
        self.dispatcher.add_observer(observer);
    }

    /// Stop the worker and drain outstanding events. Later control calls
    /// fail with [`EngineError::AlreadyShutDown`].
    pub async fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        let worker = Arc::clone(&self.worker);
        if let Err(e) = tokio::task::spawn_blocking(move || worker.shutdown()).await {
            warn!(?e, "failed to join perception worker");
        }

        if let Some(task) = self.dispatch_task.take() {
            if let Err(e) = task.await {
                warn!(?e, "dispatcher task failed");
            }
        }

        info!("gesture engine stopped");
    }
}

impl Drop for GestureEngine {
    fn drop(&mut self) {
        if self.worker.is_running() {
            // Best effort; the thread exits once the command is seen
            let _ = self.worker.send(WorkerCommand::Shutdown);
        }
    }
}
