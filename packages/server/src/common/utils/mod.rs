pub mod content_hash;
pub mod json_repair;

pub use content_hash::*;
pub use json_repair::*;
