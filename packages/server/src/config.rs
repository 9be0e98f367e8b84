use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; without it the server keeps data in memory
    pub database_url: Option<String>,
    pub port: u16,
    /// Comma-separated `GEMINI_API_KEYS`, falling back to `GEMINI_API_KEY`
    pub gemini_api_keys: Option<String>,
    pub gemini_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gemini_api_keys: non_empty_var("GEMINI_API_KEYS"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            llm_base_url: non_empty_var("LLM_BASE_URL"),
            llm_model: non_empty_var("LLM_MODEL"),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "video-quiz".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|s| parse_list(&s))
                .unwrap_or_default(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
