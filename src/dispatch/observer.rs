//! Observer interface for recognizer notifications

use crate::events::{GestureResult, RecognitionError};
use crate::gesture::{GestureState, PalmState};

/// Receives recognizer notifications on the dispatcher task.
///
/// The dispatcher only holds a `Weak` reference; dropping the last `Arc`
/// unsubscribes. All methods default to no-ops.
pub trait GestureObserver: Send + Sync {
    fn state_changed(&self, _state: GestureState) {}

    fn palm_state_changed(&self, _palm: &PalmState) {}

    fn hover_progress_updated(&self, _progress: f32) {}

    fn gesture_recognized(&self, _result: &GestureResult) {}

    fn recognition_failed(&self, _error: &RecognitionError) {}
}
