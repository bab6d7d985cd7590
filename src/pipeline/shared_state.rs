use crate::common::{GestureId, Vocabulary};
use crate::error::ConfigError;
use crate::pipeline::services::strength::Completion;
use crate::pipeline::services::{FrameThrottle, StrengthAccumulator, StrengthPolicy};
use crate::pipeline::types::{GestureLabel, StrengthEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Everything the producer and the consumers share, behind one lock
#[derive(Debug)]
struct SessionState {
    label: GestureLabel,
    accumulator: StrengthAccumulator,
    throttle: FrameThrottle,
    target: Option<GestureId>,
    challenge_epoch: u64,
}

/// The per-session boundary between the frame producer and consumers.
///
/// Cloning yields another handle to the same state. Every method is one short
/// critical section; nothing calls out to a collaborator while holding the
/// lock.
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<Mutex<SessionState>>,
    vocabulary: Vocabulary,
}

/// The active challenge as the producer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTicket {
    pub target: Option<GestureId>,
    pub epoch: u64,
}

/// Consistent view of the state at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub label: GestureLabel,
    pub strength: f32,
    pub weights: Vec<f32>,
    pub frame_count: u64,
    pub target: Option<GestureId>,
}

impl SharedState {
    pub fn new(
        vocabulary: Vocabulary,
        throttle: FrameThrottle,
        policy: Arc<dyn StrengthPolicy>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                label: GestureLabel::default(),
                accumulator: StrengthAccumulator::new(policy),
                throttle,
                target: None,
                challenge_epoch: 0,
            })),
            vocabulary,
        }
    }

    // A panic elsewhere must not wedge the session; the state is plain data
    // and stays consistent between critical sections.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Count a frame and report whether it should be classified
    pub fn should_sample(&self) -> bool {
        self.lock().throttle.should_sample()
    }

    pub fn frame_count(&self) -> u64 {
        self.lock().throttle.frame_count()
    }

    pub fn current_label(&self) -> GestureLabel {
        self.lock().label
    }

    pub fn current_label_text(&self) -> String {
        let label = self.current_label();
        label.describe(&self.vocabulary)
    }

    pub fn set_label(&self, label: GestureLabel) {
        self.lock().label = label;
    }

    pub fn strength(&self) -> f32 {
        self.lock().accumulator.strength()
    }

    pub fn weights(&self) -> Vec<f32> {
        self.lock().accumulator.weights().to_vec()
    }

    pub fn target(&self) -> Option<GestureId> {
        self.lock().target
    }

    pub fn ticket(&self) -> ChallengeTicket {
        let state = self.lock();
        ChallengeTicket {
            target: state.target,
            epoch: state.challenge_epoch,
        }
    }

    /// Activate a challenge for `target`. Unknown names are rejected and leave
    /// the current challenge untouched.
    pub fn start_challenge(&self, target: &str) -> Result<GestureId, ConfigError> {
        let id = self.vocabulary.resolve(target)?;
        let mut state = self.lock();
        state.target = Some(id);
        state.challenge_epoch += 1;
        state.accumulator.reset();
        let epoch = state.challenge_epoch;
        info!("Challenge started: {} (epoch {})", target, epoch);
        Ok(id)
    }

    /// Back to free recognition
    pub fn end_challenge(&self) {
        let mut state = self.lock();
        state.target = None;
        state.challenge_epoch += 1;
        state.accumulator.reset();
    }

    pub fn request_reset(&self) {
        self.lock().accumulator.reset();
    }

    /// Publish one classification. When the result belongs to a challenge
    /// that has since been replaced, its verdict is stripped from the label
    /// and its strength event is dropped. Returns true when this result
    /// completed the challenge.
    pub fn apply_result(
        &self,
        ticket: ChallengeTicket,
        label: GestureLabel,
        event: Option<StrengthEvent>,
    ) -> bool {
        let mut state = self.lock();
        if ticket.epoch != state.challenge_epoch {
            state.label = label.without_target();
            return false;
        }
        state.label = label;
        match event {
            Some(event) => state.accumulator.apply(event),
            None => false,
        }
    }

    /// Claim the reward of a completed challenge and reset in one step
    pub fn take_completion(&self) -> Option<Completion> {
        self.lock().accumulator.take_completion()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot {
            label: state.label,
            strength: state.accumulator.strength(),
            weights: state.accumulator.weights().to_vec(),
            frame_count: state.throttle.frame_count(),
            target: state.target,
        }
    }
}
