use crate::common::{GestureId, Vocabulary};

/// What the session currently shows for the camera feed.
///
/// Labels are compared for equality by the stabilizer, so they carry no
/// confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    #[default]
    NoHand,
    /// The hands have not moved since the previous sampled frame
    MoveHand,
    /// Free mode, confidence under the free threshold
    Unknown,
    /// Free mode, confident prediction
    Recognized(GestureId),
    /// Challenge mode, confident and equal to the target
    Match(GestureId),
    /// Challenge mode, confident but not the target
    Mismatch(GestureId),
    /// Challenge mode, confidence under the challenge threshold
    LowConfidence,
    /// The classifier failed on this frame
    Error,
}

impl GestureLabel {
    pub fn describe(&self, vocabulary: &Vocabulary) -> String {
        match self {
            GestureLabel::NoHand => "No hand detected".to_string(),
            GestureLabel::MoveHand => "Move your hand".to_string(),
            GestureLabel::Unknown | GestureLabel::LowConfidence => "Unknown gesture".to_string(),
            GestureLabel::Recognized(id) => vocabulary.name(*id).to_string(),
            GestureLabel::Match(id) => format!("{} ✅", vocabulary.name(*id)),
            GestureLabel::Mismatch(id) => format!("{} ❌", vocabulary.name(*id)),
            GestureLabel::Error => "Error".to_string(),
        }
    }

    /// The same prediction with the challenge verdict stripped, for results
    /// that no longer belong to the active target.
    pub fn without_target(self) -> Self {
        match self {
            GestureLabel::Match(id) | GestureLabel::Mismatch(id) => GestureLabel::Recognized(id),
            GestureLabel::LowConfidence => GestureLabel::Unknown,
            other => other,
        }
    }
}
