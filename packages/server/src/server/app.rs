//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::{extract_client_ip, jwt_auth_middleware};
use crate::server::routes::{
    aptitude_answer_handler, aptitude_generate_handler, aptitude_questions_handler, chat_handler,
    create_custom_quiz_handler, custom_quiz_attempts_handler, custom_quiz_handler,
    delete_custom_quiz_attempt_handler, health_handler, my_custom_quizzes_handler,
    save_quiz_score_handler, submit_custom_quiz_handler, toggle_custom_quiz_handler,
    topic_quiz_handler, user_quizzes_handler, video_quiz_handler,
};

/// Per-IP rate limit for `/api/*`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// One request is replenished every `replenish_ms`
    pub replenish_ms: u64,
    pub burst_size: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        // 10 req/s sustained with bursts of 20
        Self {
            replenish_ms: 100,
            burst_size: 20,
        }
    }
}

/// HTTP-level settings that are not domain dependencies.
#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    /// Empty allows any origin
    pub allowed_origins: Vec<String>,
    /// `None` disables rate limiting (router driven without a socket)
    pub rate_limit: Option<RateLimit>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

fn api_routes() -> Router {
    Router::new()
        // Video quizzes
        .route("/videoquiz", post(video_quiz_handler))
        .route("/save-quiz-score", post(save_quiz_score_handler))
        .route("/user-quizzes", get(user_quizzes_handler))
        // Custom quizzes
        .route("/custom-quizzes", post(create_custom_quiz_handler))
        .route("/customquiz/generate", post(topic_quiz_handler))
        .route("/my-custom-quizzes", get(my_custom_quizzes_handler))
        .route("/custom-quizzes/:code", get(custom_quiz_handler))
        .route("/custom-quizzes/:code/submit", post(submit_custom_quiz_handler))
        .route(
            "/custom-quizzes/:code/attempts",
            get(custom_quiz_attempts_handler),
        )
        .route(
            "/custom-quizzes/:code/attempts/:attempt_id",
            delete(delete_custom_quiz_attempt_handler),
        )
        .route(
            "/custom-quizzes/:code/toggle-active",
            post(toggle_custom_quiz_handler),
        )
        // Aptitude practice
        .route("/aptitude/questions", get(aptitude_questions_handler))
        .route(
            "/aptitude/generate-questions",
            post(aptitude_generate_handler),
        )
        .route("/aptitude/submit-answer", post(aptitude_answer_handler))
        // Study assistant
        .route("/chat", post(chat_handler))
}

/// Build the Axum application router
///
/// Every `/api/*` handler takes an `AuthUser`, so requests without a verified
/// bearer token are answered with 401 before any domain code runs.
pub fn build_app(deps: ServerDeps, settings: AppSettings) -> Result<Router> {
    let jwt_service = deps.jwt_service.clone();

    let mut api = api_routes();
    if let Some(limit) = settings.rate_limit {
        // Keyed on X-Forwarded-For / X-Real-IP, falling back to the peer address
        let config = GovernorConfigBuilder::default()
            .per_millisecond(limit.replenish_ms)
            .burst_size(limit.burst_size)
            .use_headers()
            .finish()
            .context("Invalid rate limit configuration")?;
        api = api.layer(GovernorLayer {
            config: Arc::new(config),
        });
    }

    let app = Router::new()
        .nest("/api", api)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(deps))
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
