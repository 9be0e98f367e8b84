// Video Quiz Platform - API Core
//
// Turns YouTube videos into multiple-choice quizzes: content retrieval,
// educational screening, LLM generation with JSON repair, and a cache keyed
// by (video id, question count, difficulty). Shareable custom quizzes,
// aptitude practice and a study assistant sit on the same infrastructure.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;
pub mod stores;

pub use config::*;
