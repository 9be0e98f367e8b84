//! Aptitude practice and study assistant endpoints.

mod common;

use crate::common::TestApp;
use axum::http::StatusCode;
use serde_json::{json, Value};
use server_core::domains::chat::actions::{GREETING_REPLY, UNAVAILABLE_REPLY};
use server_core::kernel::{MockAI, TestDependencies};

fn batch(n: usize) -> String {
    let questions: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "question": format!("What is {} + 1?", i),
                "options": [format!("{}", i), format!("{}", i + 1), "x", "y"],
                "correct": 1,
                "explanation": "Add one"
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

#[tokio::test]
async fn generation_is_admin_only() {
    let app = TestApp::new(TestDependencies::new());
    let user = app.user("student");

    let (status, body) = app
        .post(
            "/api/aptitude/generate-questions",
            &user,
            json!({"count": 10, "difficulty": "easy"}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn generate_practice_and_answer() {
    // Second batch fails and is skipped
    let ai = MockAI::new()
        .with_response(&batch(10))
        .with_error("upstream timeout")
        .with_response(&batch(5));
    let app = TestApp::new(TestDependencies::new().with_ai(ai));
    let admin = app.admin("root");
    let student = app.user("student");

    let (status, body) = app
        .post(
            "/api/aptitude/generate-questions",
            &admin,
            json!({"count": 25, "difficulty": "easy"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["generated"], 15);
    assert_eq!(body["total_in_db"], 15);
    assert_eq!(body["difficulty"], "easy");

    let (status, body) = app
        .get("/api/aptitude/questions?difficulty=easy&num_questions=5", &student)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 5);
    let first = &body["questions"][0];
    let question_id = first["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/aptitude/submit-answer",
            &student,
            json!({"question_id": question_id, "selected_option": "1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["is_correct"], true);
    assert_eq!(body["correct_option"], 1);
    assert_eq!(body["explanation"], "Add one");

    let (_, body) = app
        .post(
            "/api/aptitude/submit-answer",
            &student,
            json!({"question_id": question_id, "selected_option": 3}),
        )
        .await;
    assert_eq!(body["is_correct"], false);
    assert_eq!(app.deps.store.aptitude_answer_count().await, 2);
}

#[tokio::test]
async fn empty_bank_is_not_found() {
    let app = TestApp::new(TestDependencies::new());
    let user = app.user("student");

    let (status, body) = app
        .get("/api/aptitude/questions?difficulty=medium", &user)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No medium questions available. Please generate questions first."
    );
}

#[tokio::test]
async fn answer_requires_question_and_option() {
    let app = TestApp::new(TestDependencies::new());
    let user = app.user("student");

    let (status, body) = app
        .post("/api/aptitude/submit-answer", &user, json!({"selected_option": 1}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing data");
}

#[tokio::test]
async fn chat_greets_without_llm() {
    let app = TestApp::new(TestDependencies::new());
    let user = app.user("student");

    let (status, body) = app.post("/api/chat", &user, json!({"message": "Hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], GREETING_REPLY);
    assert_eq!(app.deps.ai.as_ref().unwrap().call_count(), 0);
}

#[tokio::test]
async fn chat_answers_and_degrades() {
    let ai = MockAI::new().with_response("<p>A closure captures its environment.</p>");
    let app = TestApp::new(TestDependencies::new().with_ai(ai));
    let user = app.user("student");

    let (status, body) = app
        .post("/api/chat", &user, json!({"message": "What is a closure?"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "<p>A closure captures its environment.</p>");

    let offline = TestApp::new(TestDependencies::new().without_ai());
    let user = offline.user("student");
    let (status, body) = offline
        .post("/api/chat", &user, json!({"message": "What is a closure?"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], UNAVAILABLE_REPLY);

    let (status, body) = offline.post("/api/chat", &user, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No message provided");
}
