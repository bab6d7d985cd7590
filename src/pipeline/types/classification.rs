use super::GestureLabel;
use crate::common::GestureId;

/// How the gate judged one prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Recognized,
    Unknown,
    Match,
    Mismatch,
    LowConfidence,
}

/// The outcome of one gated classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub predicted: GestureId,
    pub confidence: f32,
    pub verdict: Verdict,
}

/// Input to the strength accumulator derived from a challenge-mode result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrengthEvent {
    Matched { confidence: f32 },
    Missed,
}

impl ClassificationResult {
    pub fn label(&self) -> GestureLabel {
        match self.verdict {
            Verdict::Recognized => GestureLabel::Recognized(self.predicted),
            Verdict::Unknown => GestureLabel::Unknown,
            Verdict::Match => GestureLabel::Match(self.predicted),
            Verdict::Mismatch => GestureLabel::Mismatch(self.predicted),
            Verdict::LowConfidence => GestureLabel::LowConfidence,
        }
    }

    /// Free-mode results never move the strength gauge
    pub fn strength_event(&self) -> Option<StrengthEvent> {
        match self.verdict {
            Verdict::Match => Some(StrengthEvent::Matched {
                confidence: self.confidence,
            }),
            Verdict::Mismatch | Verdict::LowConfidence => Some(StrengthEvent::Missed),
            Verdict::Recognized | Verdict::Unknown => None,
        }
    }
}
