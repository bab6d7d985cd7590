/// Decides how far one event moves the match strength.
///
/// Implementations return the unclamped next value; the accumulator clamps
/// to `[0, 1]`.
pub trait StrengthPolicy: Send + Sync {
    fn on_match(&self, strength: f32, confidence: f32) -> f32;
    fn on_miss(&self, strength: f32) -> f32;
}

/// Accelerating increments: slow start, faster once the trainee has held the
/// gesture for a while. Misses decay at a flat rate.
#[derive(Debug, Clone)]
pub struct TieredStrengthPolicy {
    /// `(upper_bound, delta)` pairs in ascending order; strength below the
    /// bound gets the delta
    tiers: Vec<(f32, f32)>,
    top_delta: f32,
    decay: f32,
}

// Float accumulation must not push a value that is nominally on a tier
// boundary (0.3 after fifteen 0.02 steps) back into the lower tier.
const TIER_EPSILON: f32 = 1e-4;

impl TieredStrengthPolicy {
    pub fn new(tiers: Vec<(f32, f32)>, top_delta: f32, decay: f32) -> Self {
        Self {
            tiers,
            top_delta,
            decay,
        }
    }

    pub fn delta_for(&self, strength: f32) -> f32 {
        self.tiers
            .iter()
            .find(|(bound, _)| strength + TIER_EPSILON < *bound)
            .map(|(_, delta)| *delta)
            .unwrap_or(self.top_delta)
    }
}

impl Default for TieredStrengthPolicy {
    fn default() -> Self {
        Self::new(vec![(0.3, 0.02), (0.6, 0.05)], 0.10, 0.05)
    }
}

impl StrengthPolicy for TieredStrengthPolicy {
    fn on_match(&self, strength: f32, _confidence: f32) -> f32 {
        strength + self.delta_for(strength)
    }

    fn on_miss(&self, strength: f32) -> f32 {
        strength - self.decay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_deltas() {
        let policy = TieredStrengthPolicy::default();
        assert_eq!(policy.delta_for(0.0), 0.02);
        assert_eq!(policy.delta_for(0.29), 0.02);
        assert_eq!(policy.delta_for(0.3), 0.05);
        assert_eq!(policy.delta_for(0.59), 0.05);
        assert_eq!(policy.delta_for(0.6), 0.10);
        assert_eq!(policy.delta_for(0.95), 0.10);
    }

    #[test]
    fn accumulated_boundary_counts_as_the_upper_tier() {
        let policy = TieredStrengthPolicy::default();
        let strength = (0..15).fold(0.0_f32, |s, _| s + 0.02);
        assert_eq!(policy.delta_for(strength), 0.05);
    }

    #[test]
    fn miss_decays_by_a_flat_rate() {
        let policy = TieredStrengthPolicy::default();
        assert!((policy.on_miss(0.5) - 0.45).abs() < 1e-6);
    }
}
