//! Event republishing task

use std::sync::{Arc, Mutex, Weak};

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::events::{GestureEvent, GestureResult, RecognitionError};
use crate::gesture::{GestureState, PalmState};

use super::observer::GestureObserver;

/// Published view of the recognizer, for diagnostics and polling consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: GestureState,
    pub hover_progress: f32,
    pub last_result: Option<GestureResult>,
    pub palm: Option<PalmState>,
    pub last_error: Option<RecognitionError>,
    /// Valid hands in the most recent frame
    pub hands_in_view: usize,
    pub enabled: bool,
}

/// Fans recognizer events out to subscribers. Cheap to clone; clones
/// share the same snapshot, channel and observer list.
#[derive(Clone)]
pub struct Dispatcher {
    snapshot: Arc<RwLock<Snapshot>>,
    event_tx: broadcast::Sender<GestureEvent>,
    observers: Arc<Mutex<Vec<Weak<dyn GestureObserver>>>>,
}

impl Dispatcher {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity);
        Self {
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            event_tx,
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to the raw event stream. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.event_tx.subscribe()
    }

    /// Register an observer without taking ownership of it
    pub fn add_observer(&self, observer: Weak<dyn GestureObserver>) {
        match self.observers.lock() {
            Ok(mut observers) => observers.push(observer),
            Err(poisoned) => poisoned.into_inner().push(observer),
        }
    }

    /// Number of observers still alive
    pub fn observer_count(&self) -> usize {
        self.live_observers().len()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Run until every event sender has been dropped
    pub async fn run(self, mut event_rx: mpsc::UnboundedReceiver<GestureEvent>) {
        info!("dispatcher started");

        while let Some(event) = event_rx.recv().await {
            self.dispatch(event).await;
        }

        info!("dispatcher stopped");
    }

    /// Publish a single event
    pub async fn dispatch(&self, event: GestureEvent) {
        self.update_snapshot(&event).await;

        for observer in self.live_observers() {
            notify(observer.as_ref(), &event);
        }

        // No receivers is fine
        let _ = self.event_tx.send(event);
    }

    async fn update_snapshot(&self, event: &GestureEvent) {
        let mut snapshot = self.snapshot.write().await;
        match event {
            GestureEvent::StateChanged { state, previous } => {
                debug!(from = %previous, to = %state, "publishing state");
                snapshot.state = *state;
            }
            GestureEvent::PalmStateChanged { palm } => snapshot.palm = Some(*palm),
            GestureEvent::HoverProgress { progress } => snapshot.hover_progress = *progress,
            GestureEvent::GestureRecognized { result } => snapshot.last_result = Some(*result),
            GestureEvent::RecognitionFailed { error } => {
                warn!(%error, "recognition failed");
                snapshot.last_error = Some(error.clone());
            }
            GestureEvent::HandsDetected { hands } => snapshot.hands_in_view = hands.len(),
        }
    }

    /// Upgrade live observers, pruning any that were dropped
    fn live_observers(&self) -> Vec<Arc<dyn GestureObserver>> {
        let mut observers = match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        observers.retain(|weak| weak.strong_count() > 0);
        observers.iter().filter_map(Weak::upgrade).collect()
    }
}

fn notify(observer: &dyn GestureObserver, event: &GestureEvent) {
    match event {
        GestureEvent::StateChanged { state, .. } => observer.state_changed(*state),
        GestureEvent::PalmStateChanged { palm } => observer.palm_state_changed(palm),
        GestureEvent::HoverProgress { progress } => observer.hover_progress_updated(*progress),
        GestureEvent::GestureRecognized { result } => observer.gesture_recognized(result),
        GestureEvent::RecognitionFailed { error } => observer.recognition_failed(error),
        GestureEvent::HandsDetected { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GestureKind;
    use crate::landmarks::Point;

    #[derive(Default)]
    struct Recorder {
        states: Mutex<Vec<GestureState>>,
        gestures: Mutex<Vec<GestureKind>>,
    }

    impl GestureObserver for Recorder {
        fn state_changed(&self, state: GestureState) {
            self.states.lock().unwrap().push(state);
        }

        fn gesture_recognized(&self, result: &GestureResult) {
            self.gestures.lock().unwrap().push(result.kind);
        }
    }

    fn hovering() -> GestureEvent {
        GestureEvent::StateChanged {
            state: GestureState::Hovering,
            previous: GestureState::Idle,
        }
    }

    #[test]
    fn test_snapshot_tracks_events() {
        let dispatcher = Dispatcher::new(16);
        tokio_test::block_on(async {
            dispatcher.dispatch(hovering()).await;
            dispatcher
                .dispatch(GestureEvent::HoverProgress { progress: 0.4 })
                .await;
            dispatcher
                .dispatch(GestureEvent::RecognitionFailed {
                    error: RecognitionError::SystemError("boom".into()),
                })
                .await;

            let snapshot = dispatcher.snapshot().await;
            assert_eq!(snapshot.state, GestureState::Hovering);
            assert_eq!(snapshot.hover_progress, 0.4);
            assert!(snapshot.last_error.is_some());
            // failures do not touch state
            assert!(snapshot.last_result.is_none());
        });
    }

    #[test]
    fn test_observers_are_weak() {
        let dispatcher = Dispatcher::new(16);
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn GestureObserver> = Arc::downgrade(&recorder) as Weak<dyn GestureObserver>;
        dispatcher.add_observer(weak);
        assert_eq!(dispatcher.observer_count(), 1);

        let result = GestureResult::new(GestureKind::NextStep, 0.8, Point::new(0.5, 0.5));
        tokio_test::block_on(async {
            dispatcher.dispatch(hovering()).await;
            dispatcher.dispatch(GestureEvent::GestureRecognized { result }).await;
        });
        assert_eq!(*recorder.states.lock().unwrap(), vec![GestureState::Hovering]);
        assert_eq!(*recorder.gestures.lock().unwrap(), vec![GestureKind::NextStep]);

        drop(recorder);
        assert_eq!(dispatcher.observer_count(), 0);
        tokio_test::block_on(dispatcher.dispatch(hovering()));
    }

    #[tokio::test]
    async fn test_run_forwards_to_broadcast() {
        let dispatcher = Dispatcher::new(16);
        let mut events = dispatcher.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(dispatcher.clone().run(rx));
        tx.send(hovering()).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(events.recv().await.unwrap(), hovering());
        assert_eq!(dispatcher.snapshot().await.state, GestureState::Hovering);
    }
}
