//! Value objects shared by services.

pub mod session;

pub use session::{SessionClaims, SessionPair};
