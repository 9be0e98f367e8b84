//! Typed ID definitions for stored entities.
//!
//! ```rust,ignore
//! use server_core::common::{CustomQuizId, UserId};
//!
//! let user_id = UserId::new();
//! // let wrong: CustomQuizId = user_id; // compile error
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for users (identity comes from the verified JWT).
pub struct User;

/// Marker type for cached video quizzes.
pub struct VideoQuiz;

/// Marker type for quiz generation history entries.
pub struct QuizHistory;

/// Marker type for saved video quiz scores.
pub struct QuizScore;

/// Marker type for shareable custom quizzes.
pub struct CustomQuiz;

/// Marker type for attempts on a custom quiz.
pub struct CustomQuizAttempt;

/// Marker type for aptitude bank questions.
pub struct AptitudeQuestion;

/// Marker type for recorded aptitude answers.
pub struct AptitudeAnswer;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;
pub type VideoQuizId = Id<VideoQuiz>;
pub type QuizHistoryId = Id<QuizHistory>;
pub type QuizScoreId = Id<QuizScore>;
pub type CustomQuizId = Id<CustomQuiz>;
pub type CustomQuizAttemptId = Id<CustomQuizAttempt>;
pub type AptitudeQuestionId = Id<AptitudeQuestion>;
pub type AptitudeAnswerId = Id<AptitudeAnswer>;
