// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;
pub mod utils;

pub use auth::{Actor, AuthError};
pub use entity_ids::*;
pub use error::AppError;
pub use id::Id;
