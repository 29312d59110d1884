//! Verification token issuance and lookup.

pub mod service;

pub use service::TokenIssuer;
