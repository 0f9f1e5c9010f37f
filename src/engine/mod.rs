pub mod catalog;
pub mod challenge_deck;
pub mod chapter_unlock;
pub mod response;
pub mod session_builder;
pub mod speech_match;
pub mod stats;
pub mod trainer;
pub mod word;

pub use trainer::{Advance, SessionSummary, Trainer, TrainerError};
