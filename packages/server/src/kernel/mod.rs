//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod content;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use ai::is_rate_limit_error;
pub use deps::ServerDeps;
pub use test_dependencies::{MockAI, MockContentSource, TestDependencies};
pub use traits::*;
