//! Verification flows for email and phone contacts.
//!
//! The request side gates issuance (throttle, duplicate detection) and
//! hands off to the token issuer or the external SMS provider; the
//! submit side gates check attempts, validates the code and invokes the
//! conflict resolver.

pub mod config;
pub mod email;
pub mod phone;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use email::EmailVerificationService;
pub use phone::PhoneVerificationService;
pub use traits::{provider_codes, ProviderStatus, SmsChannel, SmsVerifyProvider};
pub use types::{EmailTarget, RequestCodeResult};
