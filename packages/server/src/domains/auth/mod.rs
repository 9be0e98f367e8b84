//! Auth domain - bearer token verification.
//!
//! Sign-up, login and password flows live outside this service; it only
//! verifies tokens issued with the shared secret.

pub mod jwt;

pub use jwt::{Claims, JwtService};
