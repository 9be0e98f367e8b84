pub mod actions;
pub mod models;

pub use actions::{
    create_custom_quiz, delete_attempt, fetch_for_attempt, generate_topic_quiz, list_attempts,
    list_my_quizzes, submit_attempt, toggle_active,
};
pub use models::{CustomQuiz, CustomQuizAttempt};
