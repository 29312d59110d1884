//! Verification resolver: the conflict-resolution engine.

pub mod service;

pub use service::VerificationResolver;
