//! PostgresStore against a real database (needs Docker).
//!
//! Run with: cargo test --test postgres_store_tests -- --ignored

mod common;

use crate::common::PostgresHarness;
use chrono::{Duration, Utc};
use serde_json::json;
use server_core::common::{
    CustomQuizAttemptId, CustomQuizId, QuizHistoryId, QuizScoreId, UserId, VideoQuizId,
};
use server_core::domains::aptitude::models::{AptitudeLevel, AptitudeQuestion};
use server_core::domains::custom_quiz::models::{CustomQuiz, CustomQuizAttempt};
use server_core::domains::quiz::models::{
    correct_answer_map, Difficulty, Question, QuizHistoryEntry, QuizKey, QuizScore, VideoQuiz,
};
use server_core::kernel::{AptitudeStore, CustomQuizStore, QuizCache};
use test_context::test_context;
use youtube_client::ContentSource;

fn question(correct: usize) -> Question {
    Question {
        question: "Which gas do plants absorb?".into(),
        options: vec!["Oxygen".into(), "Carbon dioxide".into(), "Helium".into()],
        correct,
        explanation: "Used in photosynthesis".into(),
    }
}

/// Random 11-char id so tests sharing the database never collide.
fn video_id() -> String {
    UserId::new().to_string().replace('-', "")[..11].to_string()
}

fn video_quiz(video_id: &str, notes: &str) -> VideoQuiz {
    VideoQuiz {
        id: VideoQuizId::new(),
        video_id: video_id.to_string(),
        video_url: format!("https://youtu.be/{}", video_id),
        num_questions: 3,
        difficulty: Difficulty::Hard,
        questions: vec![question(1), question(0)],
        notes: notes.into(),
        content_hash: "deadbeef".into(),
        content_source: ContentSource::Metadata,
        created_by: Some(UserId::new()),
        created_at: Utc::now(),
    }
}

fn custom_quiz(owner: UserId) -> CustomQuiz {
    CustomQuiz {
        id: CustomQuizId::new(),
        code: UserId::new().to_string()[..6].to_uppercase(),
        owner_id: owner,
        owner_username: "instructor".into(),
        title: "Plants".into(),
        video_url: None,
        num_questions: 1,
        difficulty: "custom".into(),
        quiz_data: json!({"questions": [{"question": "q", "options": ["a", "b"], "correct": 1}]}),
        active: true,
        created_at: Utc::now(),
    }
}

fn attempt(quiz: &CustomQuiz, user_id: UserId) -> CustomQuizAttempt {
    CustomQuizAttempt {
        id: CustomQuizAttemptId::new(),
        quiz_id: quiz.id,
        quiz_code: quiz.code.clone(),
        user_id,
        username: "student".into(),
        score: 1,
        total_questions: 1,
        percentage: 100.0,
        user_answers: json!({"0": 1}),
        correct_answers: json!({"0": 1}),
        submitted_at: Utc::now(),
    }
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn quiz_cache_keeps_first_insert(ctx: &PostgresHarness) {
    let vid = video_id();
    let first = ctx.store.insert_quiz(video_quiz(&vid, "first")).await.unwrap();
    let second = ctx.store.insert_quiz(video_quiz(&vid, "second")).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.notes, "first");

    let key = QuizKey {
        video_id: vid.clone(),
        num_questions: 3,
        difficulty: Difficulty::Hard,
    };
    let found = ctx.store.find_quiz(&key).await.unwrap().unwrap();
    assert_eq!(found.questions, vec![question(1), question(0)]);
    assert_eq!(found.content_source, ContentSource::Metadata);

    let other_key = QuizKey {
        difficulty: Difficulty::Easy,
        ..key
    };
    assert!(ctx.store.find_quiz(&other_key).await.unwrap().is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn history_and_latest_score(ctx: &PostgresHarness) {
    let vid = video_id();
    let quiz = ctx.store.insert_quiz(video_quiz(&vid, "")).await.unwrap();
    let user = UserId::new();

    for minutes in [10, 5] {
        ctx.store
            .record_history(QuizHistoryEntry {
                id: QuizHistoryId::new(),
                user_id: user,
                username: "ada".into(),
                quiz_id: quiz.id,
                video_id: vid.clone(),
                video_url: quiz.video_url.clone(),
                num_questions: 3,
                difficulty: Difficulty::Hard,
                generated_at: Utc::now() - Duration::minutes(minutes),
            })
            .await
            .unwrap();
    }
    let history = ctx.store.list_history(user, 1).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].generated_at > Utc::now() - Duration::minutes(6));

    for (score, minutes) in [(1, 10), (2, 1)] {
        ctx.store
            .insert_score(QuizScore {
                id: QuizScoreId::new(),
                user_id: user,
                username: "ada".into(),
                video_id: vid.clone(),
                video_url: None,
                num_questions: 3,
                difficulty: Difficulty::Hard,
                score,
                total_questions: 2,
                percentage: f64::from(score) * 50.0,
                user_answers: json!({"0": 1}),
                correct_answers: correct_answer_map(&quiz.questions),
                completed_at: Utc::now() - Duration::minutes(minutes),
            })
            .await
            .unwrap();
    }
    let latest = ctx
        .store
        .latest_score(user, &quiz.key())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.score, 2);
    assert_eq!(latest.correct_answers.get("0"), Some(&1));
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn custom_quiz_attempts_are_unique_per_user(ctx: &PostgresHarness) {
    let owner = UserId::new();
    let quiz = custom_quiz(owner);
    ctx.store.insert_custom_quiz(quiz.clone()).await.unwrap();
    assert!(ctx.store.code_exists(&quiz.code).await.unwrap());

    let student = UserId::new();
    let first = attempt(&quiz, student);
    assert!(ctx.store.insert_attempt(first.clone()).await.unwrap());
    assert!(!ctx.store.insert_attempt(attempt(&quiz, student)).await.unwrap());

    let found = ctx
        .store
        .find_attempt(&quiz.code, student)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
    assert_eq!(ctx.store.list_attempts(&quiz.code).await.unwrap().len(), 1);

    assert!(ctx.store.delete_attempt(&quiz.code, first.id).await.unwrap());
    assert!(!ctx.store.delete_attempt(&quiz.code, first.id).await.unwrap());

    ctx.store.set_custom_quiz_active(quiz.id, false).await.unwrap();
    let stored = ctx.store.find_custom_quiz(&quiz.code).await.unwrap().unwrap();
    assert!(!stored.active);
    assert_eq!(
        ctx.store
            .list_custom_quizzes_by_owner(owner)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn aptitude_bank_round_trip(ctx: &PostgresHarness) {
    let before = ctx
        .store
        .count_aptitude_questions(AptitudeLevel::Medium)
        .await
        .unwrap();

    let questions: Vec<AptitudeQuestion> = (0..3)
        .map(|i| AptitudeQuestion::new(AptitudeLevel::Medium, question(i % 3)))
        .collect();
    let wanted = questions[2].id;
    ctx.store.insert_aptitude_questions(questions).await.unwrap();

    assert_eq!(
        ctx.store
            .count_aptitude_questions(AptitudeLevel::Medium)
            .await
            .unwrap(),
        before + 3
    );

    let sample = ctx
        .store
        .sample_aptitude_questions(AptitudeLevel::Medium, 2)
        .await
        .unwrap();
    assert_eq!(sample.len(), 2);
    assert!(sample.iter().all(|q| q.difficulty == AptitudeLevel::Medium));

    let found = ctx.store.find_aptitude_question(wanted).await.unwrap().unwrap();
    assert_eq!(found.question.correct, 2);
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn ping_succeeds(ctx: &PostgresHarness) {
    ctx.store.ping().await.unwrap();
}
