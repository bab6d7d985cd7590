/// Decides which frames pay for classification.
///
/// Not synchronized on its own: it lives inside [`SharedState`] so the frame
/// counter is read and bumped under the session lock.
///
/// [`SharedState`]: crate::pipeline::SharedState
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    every: u64,
    frame_count: u64,
}

impl FrameThrottle {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frame_count: 0,
        }
    }

    /// Count one frame; true on every `every`-th call
    pub fn should_sample(&mut self) -> bool {
        self.frame_count += 1;
        self.frame_count % self.every == 0
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_every_fifth_frame_by_default() {
        let mut throttle = FrameThrottle::default();
        let sampled: Vec<u64> = (1..=10).filter(|_| throttle.should_sample()).collect();
        assert_eq!(sampled, vec![5, 10]);
        assert_eq!(throttle.frame_count(), 10);
    }

    #[test]
    fn custom_rate() {
        let mut throttle = FrameThrottle::new(3);
        let sampled: Vec<u64> = (1..=9).filter(|_| throttle.should_sample()).collect();
        assert_eq!(sampled, vec![3, 6, 9]);
    }

    #[test]
    fn zero_rate_samples_every_frame() {
        let mut throttle = FrameThrottle::new(0);
        assert!(throttle.should_sample());
        assert!(throttle.should_sample());
    }
}
