pub mod actions;
pub mod models;

pub use actions::{generate_questions, sample_questions, submit_answer};
pub use models::{AptitudeLevel, AptitudeQuestion};
