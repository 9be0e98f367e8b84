pub mod actions;
pub mod classifier;
pub mod generator;
pub mod models;
pub mod prompts;

pub use actions::{
    generate_video_quiz, list_user_quizzes, save_quiz_score, SaveScoreRequest, VideoQuizRequest,
};
pub use classifier::{classify, Classification, ClassificationMethod};
pub use models::{Difficulty, Question, QuizContent, QuizKey, VideoQuiz};
