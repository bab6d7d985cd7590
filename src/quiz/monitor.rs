use super::{ChallengeOutcome, ChallengeProgress, ChallengeSession};
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

/// Updates pushed to whoever renders the quiz
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    Progress(ChallengeProgress),
    Completed(ChallengeOutcome),
    Failed(String),
}

/// Poll loop for one [`ChallengeSession`].
///
/// Only this side sleeps; the frame producer never waits on it. Publishing
/// never waits on the listener either, so a stalled listener cannot keep the
/// loop from seeing shutdown.
pub struct ChallengeMonitor {
    session: ChallengeSession,
    interval: Duration,
    events: mpsc::Sender<QuizEvent>,
}

impl ChallengeMonitor {
    pub fn new(
        session: ChallengeSession,
        interval: Duration,
        events: mpsc::Sender<QuizEvent>,
    ) -> Self {
        Self {
            session,
            interval,
            events,
        }
    }

    /// Poll until `shutdown` flips to true (or its sender is dropped), then
    /// hand the session back so the caller can finish it.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ChallengeSession {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Challenge monitor stopping");
                        break;
                    }
                }
            }
        }

        // Claim anything that completed after the last tick
        self.poll_once();
        self.session
    }

    fn poll_once(&mut self) {
        match self.session.check() {
            Ok(Some(outcome)) => self.publish(QuizEvent::Completed(outcome)),
            Ok(None) => {}
            Err(e) => {
                error!("Could not start the next challenge: {}", e);
                self.publish(QuizEvent::Failed(e.to_string()));
            }
        }
        let progress = self.session.progress();
        self.publish(QuizEvent::Progress(progress));
    }

    // Progress is superseded by the next poll, so losing one is harmless.
    // Points are kept by the session either way.
    fn publish(&self, event: QuizEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(QuizEvent::Progress(_))) => {
                debug!("Quiz listener is behind, dropping progress update")
            }
            Err(TrySendError::Full(event)) => {
                warn!("Quiz listener is behind, dropping {:?}", event)
            }
            Err(TrySendError::Closed(_)) => debug!("No quiz listener, dropping event"),
        }
    }
}
