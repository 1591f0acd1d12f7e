//! Core gesture state machine
//!
//! Consumes per-frame detection batches and hover ticks, and emits
//! [`GestureEvent`]s. Calls must be serial; the recognizer is owned by a
//! single perception worker.

use std::collections::HashSet;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::config::GestureConfig;
use crate::events::{GestureEvent, GestureKind, GestureResult};
use crate::landmarks::HandDetectionResult;

use super::hover::{HoverSample, HoverState};
use super::motion::MotionTrackingState;
use super::pointing::classify_pointing;
use super::posture::{classify_posture, PalmState};
use super::state::GestureState;
use super::timer::Ticker;

/// Hand-gesture recognizer for one camera session
pub struct HandGestureRecognizer {
    config: GestureConfig,
    /// Current state
    state: GestureState,
    /// Time when the current non-Idle state was entered
    state_entered_at: Option<Instant>,
    /// Latest posture classification of the tracked hand
    palm: Option<PalmState>,
    hover: Option<HoverState>,
    /// Hover sampling cadence; the only posture re-check while hovering
    hover_ticker: Ticker,
    hover_progress: f32,
    motion: Option<MotionTrackingState>,
    /// Directions fired since the hand last left the frame
    triggered: HashSet<GestureKind>,
    /// A gesture fired; ignore posture and pointing until no hand is seen
    awaiting_removal: bool,
    last_result: Option<GestureResult>,
    /// Channel for emitting events
    event_tx: mpsc::UnboundedSender<GestureEvent>,
}

impl HandGestureRecognizer {
    /// Create a new recognizer in the Idle state
    pub fn new(config: GestureConfig, event_tx: mpsc::UnboundedSender<GestureEvent>) -> Self {
        let hover_ticker = Ticker::new(config.hover_sample_interval);
        Self {
            config,
            state: GestureState::Idle,
            state_entered_at: None,
            palm: None,
            hover: None,
            hover_ticker,
            hover_progress: 0.0,
            motion: None,
            triggered: HashSet::new(),
            awaiting_removal: false,
            last_result: None,
            event_tx,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn hover_progress(&self) -> f32 {
        self.hover_progress
    }

    pub fn last_result(&self) -> Option<&GestureResult> {
        self.last_result.as_ref()
    }

    pub fn palm_state(&self) -> Option<&PalmState> {
        self.palm.as_ref()
    }

    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.as_ref()
    }

    pub fn motion(&self) -> Option<&MotionTrackingState> {
        self.motion.as_ref()
    }

    pub fn triggered_directions(&self) -> &HashSet<GestureKind> {
        &self.triggered
    }

    pub fn is_awaiting_removal(&self) -> bool {
        self.awaiting_removal
    }

    /// When the worker should next call [`poll_timers`](Self::poll_timers)
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.hover_ticker.next_deadline()
    }

    /// Process one frame's worth of detected hands.
    ///
    /// An empty batch means no hand is in view.
    pub fn process_detections(&mut self, hands: &[HandDetectionResult], now: Instant) {
        let Some(hand) = HandDetectionResult::best(hands) else {
            self.handle_hand_lost(now);
            return;
        };

        if self.awaiting_removal {
            // Keep the position trace fresh; everything else waits for the
            // hand to leave.
            if let Some(motion) = self.motion.as_mut() {
                motion.update(now, hand.centroid(), self.config.motion_direction_min_distance);
            }
            return;
        }

        if self.state.tracks_posture() {
            let palm = self.update_palm(hand);
            match self.state {
                // Evaluated on the next hover tick
                GestureState::Hovering => {}
                _ if palm.is_held(self.config.posture_confidence_threshold) => {
                    self.enter_hovering(now, &palm);
                }
                GestureState::Idle => self.transition_to(GestureState::Detecting, now),
                _ => {}
            }
        } else if self.state.tracks_pointing() {
            if let Some(motion) = self.motion.as_mut() {
                motion.update(now, hand.centroid(), self.config.motion_direction_min_distance);
                trace!(
                    velocity = motion.velocity,
                    distance = motion.distance,
                    direction = ?motion.direction,
                    "motion trace"
                );
            }
            self.evaluate_pointing(hand, now);
        }
    }

    /// Fire any due timer. Call once the deadline from
    /// [`next_timer_deadline`](Self::next_timer_deadline) has passed.
    pub fn poll_timers(&mut self, now: Instant) {
        if self.hover_ticker.fire_due(now) {
            self.on_hover_tick(now);
        }
    }

    /// Return to Idle, dropping all session state and cancelling timers
    pub fn reset(&mut self, now: Instant) {
        debug!(state = %self.state, "resetting recognizer");
        self.clear_hover();
        self.motion = None;
        self.palm = None;
        self.triggered.clear();
        self.awaiting_removal = false;
        if self.state != GestureState::Idle {
            self.transition_to(GestureState::Idle, now);
        }
    }

    /// Handle a batch with no hands
    fn handle_hand_lost(&mut self, now: Instant) {
        if self.awaiting_removal {
            debug!("hand removed, gesture cycle complete");
            self.awaiting_removal = false;
            self.triggered.clear();
        } else if self.state == GestureState::Idle {
            return;
        }

        self.clear_hover();
        self.motion = None;
        self.palm = None;
        self.transition_to(GestureState::Idle, now);
    }

    fn update_palm(&mut self, hand: &HandDetectionResult) -> PalmState {
        let palm = classify_posture(hand, &self.config);
        trace!(
            held = palm.is_confirmation_posture,
            confidence = palm.confidence,
            fingers = ?palm.fingers.as_array(),
            "palm state"
        );
        self.palm = Some(palm);
        self.emit(GestureEvent::PalmStateChanged { palm });
        palm
    }

    fn enter_hovering(&mut self, now: Instant, palm: &PalmState) {
        self.hover = Some(HoverState::begin(now, palm.centroid));
        self.hover_ticker.start(now);
        self.set_hover_progress(0.0);
        self.transition_to(GestureState::Hovering, now);
    }

    fn on_hover_tick(&mut self, now: Instant) {
        if self.state != GestureState::Hovering {
            self.clear_hover();
            return;
        }

        let threshold = self.config.posture_confidence_threshold;
        let Some(palm) = self.palm else {
            self.leave_hover_to_detecting(now);
            return;
        };
        let Some(hover) = self.hover.as_mut() else {
            self.leave_hover_to_detecting(now);
            return;
        };

        match hover.sample(now, palm.centroid, &self.config) {
            HoverSample::Restarted => debug!("hand moved, hover restarted"),
            HoverSample::Unsteady => trace!("hover sample outside stability threshold"),
            HoverSample::Stable => {}
        }
        let progress = hover.progress(self.config.hover_duration);
        let complete = hover.is_complete(self.config.hover_duration);
        self.set_hover_progress(progress);

        if !palm.is_held(threshold) {
            debug!(confidence = palm.confidence, "posture lost while hovering");
            self.leave_hover_to_detecting(now);
            return;
        }

        if complete {
            self.clear_hover();
            self.motion = Some(MotionTrackingState::begin(now, palm.centroid));
            self.transition_to(GestureState::Ready, now);
        }
    }

    fn leave_hover_to_detecting(&mut self, now: Instant) {
        self.clear_hover();
        self.transition_to(GestureState::Detecting, now);
    }

    fn evaluate_pointing(&mut self, hand: &HandDetectionResult, now: Instant) {
        let Some(reading) = classify_pointing(hand, &self.config) else {
            return;
        };
        let Some(kind) = reading.kind else {
            return;
        };

        if reading.curled_fingers < self.config.min_curled_for_pointing {
            debug!(
                curled = reading.curled_fingers,
                required = self.config.min_curled_for_pointing,
                "pointing ignored, too few curled fingers"
            );
            return;
        }
        if self.triggered.contains(&kind) {
            return;
        }

        self.transition_to(GestureState::Processing, now);

        self.triggered.insert(kind);
        self.awaiting_removal = true;

        let result = GestureResult::new(kind, reading.confidence, hand.centroid());
        info!(
            kind = %kind,
            confidence = result.confidence,
            angle_deg = reading.angle_deg,
            "gesture recognized"
        );
        self.last_result = Some(result);
        self.emit(GestureEvent::GestureRecognized { result });

        self.transition_to(GestureState::Completed, now);
    }

    /// Cancel the hover ticker and drop hover state
    fn clear_hover(&mut self) {
        self.hover_ticker.cancel();
        self.hover = None;
        if self.hover_progress != 0.0 {
            self.set_hover_progress(0.0);
        }
    }

    fn set_hover_progress(&mut self, progress: f32) {
        self.hover_progress = progress;
        self.emit(GestureEvent::HoverProgress { progress });
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: GestureState, now: Instant) {
        let old_state = self.state;
        let duration_ms = self
            .state_entered_at
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_entered_at = if new_state != GestureState::Idle {
            Some(now)
        } else {
            None
        };

        self.emit(GestureEvent::StateChanged {
            state: new_state,
            previous: old_state,
        });
    }

    fn emit(&self, event: GestureEvent) {
        trace!(%event, "emitting event");
        let _ = self.event_tx.send(event);
    }
}
