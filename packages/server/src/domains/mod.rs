// Domain modules
pub mod aptitude;
pub mod auth;
pub mod chat;
pub mod custom_quiz;
pub mod quiz;
