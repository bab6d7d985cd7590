pub mod landmark;
pub mod vocabulary;

pub use landmark::{HandObservation, Landmark, LANDMARKS_PER_HAND, MAX_HANDS};
pub use vocabulary::{GestureId, Vocabulary};
