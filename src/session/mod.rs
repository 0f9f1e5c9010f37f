pub mod practice;
pub mod schedule;

pub use practice::Session;
