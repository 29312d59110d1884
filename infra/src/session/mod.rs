//! Session token service implementations.

pub mod jwt;

pub use jwt::{JwtSessionService, SessionConfig};
