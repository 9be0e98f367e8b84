//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. External services use trait abstractions so tests can swap them.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseAI, BaseContentSource, Store};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn Store>,
    /// `None` when no API key is configured; AI features degrade or refuse
    pub ai: Option<Arc<dyn BaseAI>>,
    pub content: Arc<dyn BaseContentSource>,
    /// JWT service for token verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn Store>,
        ai: Option<Arc<dyn BaseAI>>,
        content: Arc<dyn BaseContentSource>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            ai,
            content,
            jwt_service,
        }
    }

    pub fn ai(&self) -> Option<&dyn BaseAI> {
        self.ai.as_deref()
    }
}
