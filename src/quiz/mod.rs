pub mod challenge;
pub mod monitor;
pub mod score;

pub use challenge::{ChallengeOutcome, ChallengeProgress, ChallengeSession};
pub use monitor::{ChallengeMonitor, QuizEvent};
pub use score::{MemoryLeaderboard, RankedScore, ScoreSink};
