use super::ScoreSink;
use crate::config::QuizSettings;
use crate::error::{ConfigError, LeaderboardError};
use crate::pipeline::services::strength::accumulator::reward_for;
use crate::pipeline::SharedState;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};

/// What the quiz UI shows on each poll
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeProgress {
    pub target: String,
    pub label: String,
    pub strength: f32,
    /// Strength as drawn on the progress bar; 0 until it clears the floor
    pub display: f32,
    /// Points the trainee would get if the challenge completed now
    pub pending_points: u32,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeOutcome {
    pub target: String,
    pub reward: u32,
    pub total_points: u32,
    pub completed_at: DateTime<Utc>,
}

/// The consumer side of a quiz: picks targets, watches the shared state and
/// converts completions into points.
pub struct ChallengeSession {
    shared: SharedState,
    targets: Vec<String>,
    current: usize,
    player: String,
    points: u32,
    completed: usize,
    display_floor: f32,
    rng: StdRng,
    sink: Arc<dyn ScoreSink>,
}

impl ChallengeSession {
    /// Every configured target must resolve against the session vocabulary
    pub fn new(
        shared: SharedState,
        settings: &QuizSettings,
        player: impl Into<String>,
        sink: Arc<dyn ScoreSink>,
    ) -> Result<Self, ConfigError> {
        if settings.challenge_targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for target in &settings.challenge_targets {
            shared.vocabulary().resolve(target)?;
        }

        Ok(Self {
            shared,
            targets: settings.challenge_targets.clone(),
            current: 0,
            player: player.into(),
            points: 0,
            completed: 0,
            display_floor: settings.progress_display_floor,
            rng: StdRng::from_os_rng(),
            sink,
        })
    }

    /// Deterministic target order, for tests and replays
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start the first challenge on a random target
    pub fn begin(&mut self) -> Result<(), ConfigError> {
        self.current = self.rng.random_range(0..self.targets.len());
        self.shared.start_challenge(&self.targets[self.current])?;
        Ok(())
    }

    pub fn current_target(&self) -> &str {
        &self.targets[self.current]
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn progress(&self) -> ChallengeProgress {
        let snapshot = self.shared.snapshot();
        let display = if snapshot.strength > self.display_floor {
            snapshot.strength.min(1.0)
        } else {
            0.0
        };
        let pending_points = if display > 0.0 {
            reward_for(&snapshot.weights)
        } else {
            0
        };

        ChallengeProgress {
            target: self.current_target().to_string(),
            label: snapshot.label.describe(self.shared.vocabulary()),
            strength: snapshot.strength,
            display,
            pending_points,
            total_points: self.points,
        }
    }

    /// Claim a finished challenge, if there is one, and move on to the next
    /// target. Safe to call on every poll: a completion is paid out once.
    pub fn check(&mut self) -> Result<Option<ChallengeOutcome>, ConfigError> {
        let Some(completion) = self.shared.take_completion() else {
            return Ok(None);
        };

        self.points += completion.reward;
        self.completed += 1;
        let outcome = ChallengeOutcome {
            target: self.current_target().to_string(),
            reward: completion.reward,
            total_points: self.points,
            completed_at: Utc::now(),
        };
        info!(
            "{} is correct, +{} points (total {})",
            outcome.target, outcome.reward, outcome.total_points
        );

        self.advance();
        self.shared.start_challenge(&self.targets[self.current])?;
        Ok(Some(outcome))
    }

    // Rotate by a random non-zero offset so the same gesture never repeats
    fn advance(&mut self) {
        let count = self.targets.len();
        if count > 1 {
            self.current = (self.current + self.rng.random_range(1..count)) % count;
        }
    }

    /// Close the session and report the score. Zero scores are not submitted.
    pub async fn finish(self) -> Result<u32, LeaderboardError> {
        self.shared.end_challenge();
        if self.points > 0 {
            if let Err(e) = self.sink.submit(&self.player, self.points).await {
                warn!("Failed to submit score for {}: {}", self.player, e);
                return Err(e);
            }
        }
        info!(
            "Session finished for {}: {} points over {} challenges",
            self.player, self.points, self.completed
        );
        Ok(self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Vocabulary;
    use crate::pipeline::services::{FrameThrottle, TieredStrengthPolicy};
    use crate::pipeline::{GestureLabel, StrengthEvent};
    use crate::quiz::MemoryLeaderboard;

    fn shared() -> SharedState {
        SharedState::new(
            Vocabulary::new(["Hammer", "Lehrer", "Lehrnen", "Schule"]),
            FrameThrottle::new(1),
            Arc::new(TieredStrengthPolicy::default()),
        )
    }

    fn session(board: Arc<MemoryLeaderboard>) -> ChallengeSession {
        ChallengeSession::new(shared(), &QuizSettings::default(), "anna", board)
            .unwrap()
            .with_seed(7)
    }

    fn feed_matches(session: &ChallengeSession, confidences: &[f32]) {
        let shared = session.shared();
        let ticket = shared.ticket();
        let target = ticket.target.unwrap();
        for confidence in confidences {
            shared.apply_result(
                ticket,
                GestureLabel::Match(target),
                Some(StrengthEvent::Matched {
                    confidence: *confidence,
                }),
            );
        }
    }

    #[test]
    fn unknown_targets_fail_at_construction() {
        let settings = QuizSettings {
            challenge_targets: vec!["Hammer".to_string(), "Zange".to_string()],
            ..QuizSettings::default()
        };
        let board = Arc::new(MemoryLeaderboard::new());
        let result = ChallengeSession::new(shared(), &settings, "anna", board);
        let unknown = ConfigError::UnknownTarget("Zange".to_string());
        assert_eq!(result.err(), Some(unknown));
    }

    #[test]
    fn empty_target_list_fails() {
        let settings = QuizSettings {
            challenge_targets: vec![],
            ..QuizSettings::default()
        };
        let board = Arc::new(MemoryLeaderboard::new());
        let result = ChallengeSession::new(shared(), &settings, "anna", board);
        assert!(matches!(result, Err(ConfigError::NoTargets)));
    }

    #[test]
    fn progress_bar_stays_empty_below_the_floor() {
        let mut session = session(Arc::new(MemoryLeaderboard::new()));
        session.begin().unwrap();
        feed_matches(&session, &[0.9, 0.9]);

        let progress = session.progress();
        assert!((progress.strength - 0.04).abs() < 1e-6);
        assert_eq!(progress.display, 0.0);
        assert_eq!(progress.pending_points, 0);

        feed_matches(&session, &[0.9]);
        let progress = session.progress();
        assert!(progress.display > 0.05);
        assert_eq!(progress.pending_points, 3);
    }

    #[test]
    fn completion_pays_once_and_moves_to_another_target() {
        let mut session = session(Arc::new(MemoryLeaderboard::new()));
        session.begin().unwrap();
        let first = session.current_target().to_string();

        feed_matches(&session, &[0.8; 30]);
        assert_eq!(session.shared().strength(), 1.0);

        let outcome = session.check().unwrap().unwrap();
        assert_eq!(outcome.target, first);
        assert_eq!(outcome.reward, 24);
        assert_eq!(session.points(), 24);

        // The next poll sees a fresh challenge, not the old completion
        assert!(session.check().unwrap().is_none());
        assert_eq!(session.shared().strength(), 0.0);
        assert!(session.shared().weights().is_empty());
        assert_ne!(session.current_target(), first);
        assert_eq!(session.points(), 24);
    }

    #[test]
    fn single_target_repeats() {
        let settings = QuizSettings {
            challenge_targets: vec!["Schule".to_string()],
            ..QuizSettings::default()
        };
        let board = Arc::new(MemoryLeaderboard::new());
        let result = ChallengeSession::new(shared(), &settings, "anna", board);
        let mut session = result.unwrap();
        session.begin().unwrap();
        feed_matches(&session, &[1.0; 30]);
        session.check().unwrap().unwrap();
        assert_eq!(session.current_target(), "Schule");
    }

    #[tokio::test]
    async fn finish_submits_the_total() {
        let board = Arc::new(MemoryLeaderboard::new());
        let mut session = session(board.clone());
        session.begin().unwrap();
        feed_matches(&session, &[0.8; 30]);
        session.check().unwrap();

        let points = session.finish().await.unwrap();
        assert_eq!(points, 24);
        assert_eq!(board.find("anna").await.unwrap().score, 24);
    }

    #[tokio::test]
    async fn zero_scores_are_not_submitted() {
        let board = Arc::new(MemoryLeaderboard::new());
        let session = session(board.clone());
        assert_eq!(session.finish().await.unwrap(), 0);
        assert!(board.top(10).await.is_empty());
    }
}
