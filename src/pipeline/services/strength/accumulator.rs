use super::{StrengthPolicy, TieredStrengthPolicy};
use crate::pipeline::types::StrengthEvent;
use std::sync::Arc;

/// Strength at which a challenge counts as passed
pub const COMPLETE: f32 = 1.0;

/// Hysteresis gauge for one challenge.
///
/// `strength` and `weights` only change together, through the methods below.
#[derive(Clone)]
pub struct StrengthAccumulator {
    strength: f32,
    weights: Vec<f32>,
    policy: Arc<dyn StrengthPolicy>,
}

/// A claimed challenge completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub weights: Vec<f32>,
    pub reward: u32,
}

impl StrengthAccumulator {
    pub fn new(policy: Arc<dyn StrengthPolicy>) -> Self {
        Self {
            strength: 0.0,
            weights: Vec::new(),
            policy,
        }
    }

    /// Apply one challenge-mode event. Returns true on the event that takes
    /// strength to completion.
    pub fn apply(&mut self, event: StrengthEvent) -> bool {
        match event {
            StrengthEvent::Matched { confidence } => self.record_match(confidence),
            StrengthEvent::Missed => {
                self.record_miss();
                false
            }
        }
    }

    pub fn record_match(&mut self, confidence: f32) -> bool {
        let was_complete = self.is_complete();
        self.strength = self
            .policy
            .on_match(self.strength, confidence)
            .clamp(0.0, COMPLETE);
        self.weights.push(confidence.clamp(0.0, 1.0));
        !was_complete && self.is_complete()
    }

    pub fn record_miss(&mut self) {
        self.strength = self.policy.on_miss(self.strength).clamp(0.0, COMPLETE);
    }

    pub fn reset(&mut self) {
        self.strength = 0.0;
        self.weights.clear();
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn is_complete(&self) -> bool {
        self.strength >= COMPLETE
    }

    /// `round(sum(weights))`
    pub fn reward(&self) -> u32 {
        reward_for(&self.weights)
    }

    /// If the challenge is complete, hand out its reward and reset in the same
    /// step, so a second call returns `None`.
    pub fn take_completion(&mut self) -> Option<Completion> {
        if !self.is_complete() {
            return None;
        }
        let weights = std::mem::take(&mut self.weights);
        self.strength = 0.0;
        Some(Completion {
            reward: reward_for(&weights),
            weights,
        })
    }
}

impl Default for StrengthAccumulator {
    fn default() -> Self {
        Self::new(Arc::new(TieredStrengthPolicy::default()))
    }
}

impl std::fmt::Debug for StrengthAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrengthAccumulator")
            .field("strength", &self.strength)
            .field("weights", &self.weights)
            .finish()
    }
}

pub fn reward_for(weights: &[f32]) -> u32 {
    weights.iter().sum::<f32>().round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn at(strength_steps: &[f32]) -> StrengthAccumulator {
        // Drive the accumulator to a point using matches only
        let mut accumulator = StrengthAccumulator::default();
        for confidence in strength_steps {
            accumulator.record_match(*confidence);
        }
        accumulator
    }

    #[test]
    fn first_ten_matches_add_two_hundredths_each() {
        let mut accumulator = StrengthAccumulator::default();
        let mut previous = accumulator.strength();
        for _ in 0..10 {
            accumulator.record_match(0.8);
            assert!((accumulator.strength() - previous - 0.02).abs() < EPS);
            previous = accumulator.strength();
        }
        assert!((accumulator.strength() - 0.2).abs() < EPS);
        assert_eq!(accumulator.weights().len(), 10);
    }

    #[test]
    fn increments_accelerate_at_tier_boundaries() {
        let mut accumulator = StrengthAccumulator::default();
        // 15 x 0.02 reaches the first boundary
        for _ in 0..15 {
            accumulator.record_match(0.5);
        }
        assert!((accumulator.strength() - 0.3).abs() < EPS);

        accumulator.record_match(0.5);
        assert!((accumulator.strength() - 0.35).abs() < EPS);

        // 5 more x 0.05 reaches 0.6
        for _ in 0..5 {
            accumulator.record_match(0.5);
        }
        assert!((accumulator.strength() - 0.6).abs() < EPS);

        accumulator.record_match(0.5);
        assert!((accumulator.strength() - 0.7).abs() < EPS);
    }

    #[test]
    fn clamps_to_exactly_one() {
        let mut accumulator = StrengthAccumulator::default();
        accumulator.strength = 0.95;
        let completed = accumulator.record_match(0.9);
        assert_eq!(accumulator.strength(), 1.0);
        assert!(completed);
    }

    #[test]
    fn completion_is_edge_triggered() {
        let mut accumulator = StrengthAccumulator::default();
        accumulator.strength = 0.95;
        assert!(accumulator.record_match(0.9));
        assert!(!accumulator.record_match(0.9));
        assert_eq!(accumulator.strength(), 1.0);
    }

    #[test]
    fn decay_never_goes_below_zero() {
        let mut accumulator = at(&[0.9]);
        for _ in 0..5 {
            accumulator.record_miss();
        }
        assert_eq!(accumulator.strength(), 0.0);
        // Misses do not touch weights
        assert_eq!(accumulator.weights(), &[0.9]);
    }

    #[test]
    fn reset_clears_any_state() {
        let mut accumulator = at(&[0.4, 0.6, 0.9, 0.7]);
        accumulator.reset();
        assert_eq!(accumulator.strength(), 0.0);
        assert!(accumulator.weights().is_empty());
    }

    #[test]
    fn reward_rounds_the_weight_sum() {
        let accumulator = at(&[0.4, 0.6, 0.9]);
        assert_eq!(accumulator.reward(), 2);
        assert_eq!(reward_for(&[]), 0);
        assert_eq!(reward_for(&[0.2, 0.2]), 0);
    }

    #[test]
    fn take_completion_only_once() {
        let mut accumulator = at(&[0.4, 0.6, 0.9]);
        assert!(accumulator.take_completion().is_none());

        accumulator.strength = COMPLETE;
        let completion = accumulator.take_completion().unwrap();
        assert_eq!(completion.reward, 2);
        assert_eq!(completion.weights, vec![0.4, 0.6, 0.9]);

        assert!(accumulator.take_completion().is_none());
        assert_eq!(accumulator.strength(), 0.0);
        assert!(accumulator.weights().is_empty());
    }

    #[test]
    fn apply_routes_events() {
        let mut accumulator = StrengthAccumulator::default();
        accumulator.apply(StrengthEvent::Matched { confidence: 0.5 });
        assert!((accumulator.strength() - 0.02).abs() < EPS);
        accumulator.apply(StrengthEvent::Missed);
        assert_eq!(accumulator.strength(), 0.0);
        assert_eq!(accumulator.weights().len(), 1);
    }
}
