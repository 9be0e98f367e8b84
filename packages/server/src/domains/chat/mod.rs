//! Study assistant chat. Conversations are not stored.

pub mod actions;

pub use actions::{ask, is_greeting};
