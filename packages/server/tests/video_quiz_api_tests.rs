//! Video quiz endpoints driven through the router.

mod common;

use crate::common::TestApp;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use server_core::kernel::{MockAI, MockContentSource, TestDependencies};

const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const LECTURE: &str = "In this lecture we explain the theory of photosynthesis: how chlorophyll captures light and how plants store chemical energy as glucose.";

fn educational() -> &'static str {
    r#"{"is_educational": true, "reason": "A biology lecture."}"#
}

fn quiz_reply(n: usize) -> String {
    let questions: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "question": format!("Question {}", i + 1),
                "options": ["Light", "Water", "Soil", "Air"],
                "correct": i % 4,
                "explanation": "See the lecture"
            })
        })
        .collect();
    // Fenced like real model output
    format!(
        "```json\n{}\n```",
        json!({"questions": questions, "notes": "<h3>Notes</h3>"})
    )
}

fn app_with(ai: MockAI, content: MockContentSource) -> TestApp {
    TestApp::new(TestDependencies::new().with_ai(ai).with_content(content))
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::new(TestDependencies::new());

    let (status, body) = app
        .request(Method::POST, "/api/videoquiz", None, Some(json!({"yt_url": URL})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn generates_then_serves_from_cache() {
    let ai = MockAI::new()
        .with_response(educational())
        .with_response(&quiz_reply(3));
    let app = app_with(ai, MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    let request = json!({"yt_url": URL, "num_questions": "3", "difficulty": "easy"});
    let (status, body) = app.post("/api/videoquiz", &user, request.clone()).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["cached"], false);
    assert_eq!(body["content_source"], "transcript");
    assert_eq!(body["response"]["questions"].as_array().unwrap().len(), 3);
    assert_eq!(body["response"]["notes"], "<h3>Notes</h3>");

    // Same key from another user: no fetch, no LLM call
    let other = app.user("bob");
    let (status, body) = app.post("/api/videoquiz", &other, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
    assert_eq!(body["response"]["questions"].as_array().unwrap().len(), 3);
    assert_eq!(app.deps.content.calls().len(), 1);
    assert_eq!(app.deps.ai.as_ref().unwrap().call_count(), 2);
    assert_eq!(app.deps.store.quiz_count().await, 1);
}

#[tokio::test]
async fn different_difficulty_is_a_different_quiz() {
    let ai = MockAI::new()
        .with_response(educational())
        .with_response(&quiz_reply(3))
        .with_response(educational())
        .with_response(&quiz_reply(3));
    let app = app_with(ai, MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    for difficulty in ["easy", "hard"] {
        let (status, body) = app
            .post(
                "/api/videoquiz",
                &user,
                json!({"yt_url": URL, "num_questions": 3, "difficulty": difficulty}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["cached"], false);
    }

    assert_eq!(app.deps.store.quiz_count().await, 2);
}

#[tokio::test]
async fn question_count_out_of_range_is_rejected() {
    let app = app_with(MockAI::new(), MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    let (status, body) = app
        .post("/api/videoquiz", &user, json!({"yt_url": URL, "num_questions": 25}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Number of questions must be between 3 and 20.");
    assert!(app.deps.content.calls().is_empty());
}

#[tokio::test]
async fn url_without_video_id_is_rejected() {
    let app = app_with(MockAI::new(), MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    let (status, _) = app
        .post("/api/videoquiz", &user, json!({"yt_url": "https://example.com/video"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_educational_video_is_rejected() {
    let ai = MockAI::new().with_response(r#"{"is_educational": false, "reason": "This is a music video."}"#);
    let app = app_with(
        ai,
        MockContentSource::metadata(
            "Never Gonna Give You Up",
            "Video Title: Never Gonna Give You Up\n\nDescription: The official music video, remastered in 4K.",
        ),
    );
    let user = app.user("ada");

    let (status, body) = app.post("/api/videoquiz", &user, json!({"yt_url": URL})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("This video does not appear to be educational content."));
    assert!(error.contains("This is a music video."));
    assert_eq!(app.deps.store.quiz_count().await, 0);
}

#[tokio::test]
async fn unavailable_content_reports_strategy_log() {
    let app = app_with(
        MockAI::new(),
        MockContentSource::unavailable(&["transcript: disabled", "oembed: 404"]),
    );
    let user = app.user("ada");

    let (status, body) = app.post("/api/videoquiz", &user, json!({"yt_url": URL})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Debug details:<br>transcript: disabled<br>oembed: 404"));
}

#[tokio::test]
async fn unparseable_quiz_returns_raw_response() {
    let ai = MockAI::new()
        .with_response(educational())
        .with_response("Sorry, I cannot help with that.");
    let app = app_with(ai, MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    let (status, body) = app.post("/api/videoquiz", &user, json!({"yt_url": URL})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse quiz JSON."));
    assert!(body["raw_response"]
        .as_str()
        .unwrap()
        .contains("Sorry, I cannot help"));
    assert_eq!(app.deps.store.quiz_count().await, 0);
}

#[tokio::test]
async fn missing_ai_is_service_unavailable() {
    let app = TestApp::new(
        TestDependencies::new()
            .without_ai()
            .with_content(MockContentSource::transcript(LECTURE)),
    );
    let user = app.user("ada");

    let (status, _) = app.post("/api/videoquiz", &user, json!({"yt_url": URL})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn saved_score_shows_in_history() {
    let ai = MockAI::new()
        .with_response(educational())
        .with_response(&quiz_reply(3));
    let app = app_with(ai, MockContentSource::transcript(LECTURE));
    let user = app.user("ada");

    let (status, _) = app
        .post(
            "/api/videoquiz",
            &user,
            json!({"yt_url": URL, "num_questions": 3, "difficulty": "medium"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/save-quiz-score",
            &user,
            json!({
                "video_id": "dQw4w9WgXcQ",
                "video_url": URL,
                "num_questions": 3,
                "difficulty": "medium",
                "score": 2,
                "total_questions": 3,
                "user_answers": {"0": 0, "1": 1, "2": 3}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["percentage"], 66.67);

    let (status, body) = app.get("/api/user-quizzes", &user).await;
    assert_eq!(status, StatusCode::OK);
    let quizzes = body["quizzes"].as_array().unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0]["video_id"], "dQw4w9WgXcQ");
    assert_eq!(quizzes[0]["score"], 2);
    assert_eq!(quizzes[0]["completed"], true);

    // History is per user
    let (_, body) = app.get("/api/user-quizzes", &app.user("bob")).await;
    assert!(body["quizzes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn score_for_unknown_quiz_is_not_found() {
    let app = TestApp::new(TestDependencies::new());
    let user = app.user("ada");

    let (status, body) = app
        .post(
            "/api/save-quiz-score",
            &user,
            json!({
                "video_id": "dQw4w9WgXcQ",
                "num_questions": 5,
                "difficulty": "medium",
                "score": 1,
                "total_questions": 5
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Quiz not found");

    let (status, body) = app
        .post("/api/save-quiz-score", &user, json!({"video_id": "dQw4w9WgXcQ"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::new(TestDependencies::new());

    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}
