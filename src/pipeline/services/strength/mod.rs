pub mod accumulator;
pub mod strength_policy;

pub use accumulator::{Completion, StrengthAccumulator};
pub use strength_policy::{StrengthPolicy, TieredStrengthPolicy};
