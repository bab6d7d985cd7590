use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Sliding-window majority vote over the raw label stream.
///
/// The window is a FIFO of the last `window` labels. Once it is full, the most
/// frequent label replaces the stable label if it holds at least `quorum` of
/// the window; otherwise the previous stable label is kept.
#[derive(Debug, Clone)]
pub struct Stabilizer<L> {
    window: VecDeque<L>,
    capacity: usize,
    quorum: f32,
    stable: Option<L>,
}

impl<L: Clone + Eq + Hash> Stabilizer<L> {
    pub fn new(capacity: usize, quorum: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            quorum: quorum.clamp(0.0, 1.0),
            stable: None,
        }
    }

    /// Push one raw label and return the current stable label, if any
    pub fn push(&mut self, raw: L) -> Option<L> {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(raw);

        if self.window.len() == self.capacity {
            if let Some((label, count)) = self.majority() {
                if count as f32 / self.capacity as f32 >= self.quorum {
                    if self.stable.as_ref() != Some(&label) {
                        tracing::debug!("Stable label changed ({}/{} votes)", count, self.capacity);
                    }
                    self.stable = Some(label);
                }
            }
        }

        self.stable.clone()
    }

    pub fn stable(&self) -> Option<&L> {
        self.stable.as_ref()
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    /// Forget the window and the stable label
    pub fn clear(&mut self) {
        self.window.clear();
        self.stable = None;
    }

    // Ties go to the label seen most recently.
    fn majority(&self) -> Option<(L, usize)> {
        let mut counts: HashMap<&L, usize> = HashMap::new();
        for label in &self.window {
            *counts.entry(label).or_insert(0) += 1;
        }
        let best = counts.values().copied().max()?;
        self.window
            .iter()
            .rev()
            .find(|label| counts.get(label) == Some(&best))
            .map(|label| (label.clone(), best))
    }
}

impl<L: Clone + Eq + Hash> Default for Stabilizer<L> {
    fn default() -> Self {
        Self::new(10, 0.6)
    }
}
