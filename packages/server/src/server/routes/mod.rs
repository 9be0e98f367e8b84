// HTTP routes
pub mod aptitude;
pub mod chat;
pub mod custom_quiz;
pub mod health;
pub mod quiz;

pub use aptitude::*;
pub use chat::*;
pub use custom_quiz::*;
pub use health::*;
pub use quiz::*;
