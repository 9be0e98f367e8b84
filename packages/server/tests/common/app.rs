//! Drives the axum router in-process with `oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::{build_app, AppSettings};
use tower::ServiceExt;
use uuid::Uuid;

/// A signed-in test user.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

pub struct TestApp {
    pub deps: TestDependencies,
    router: Router,
}

impl TestApp {
    pub fn new(deps: TestDependencies) -> Self {
        let router = build_app(deps.into_server_deps(), AppSettings::default())
            .expect("Failed to build router");
        Self { deps, router }
    }

    pub fn user(&self, username: &str) -> TestUser {
        self.sign_in(username, false)
    }

    pub fn admin(&self, username: &str) -> TestUser {
        self.sign_in(username, true)
    }

    fn sign_in(&self, username: &str, is_admin: bool) -> TestUser {
        let user_id = Uuid::new_v4();
        let token = self
            .deps
            .jwt_service
            .create_token(user_id, username.to_string(), is_admin)
            .expect("Failed to create token");
        TestUser {
            user_id,
            username: username.to_string(),
            token,
        }
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&TestUser>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", user.token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(user), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(user), None).await
    }
}
