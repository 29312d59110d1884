//! Shared utilities and common types for the Vouch backend
//!
//! This crate provides common functionality used across all server modules:
//! - Throttle window configuration
//! - Error response structures
//! - Utility functions (email/phone validation, normalization)
//! - Common response wrappers

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::ThrottleWindows;
pub use errors::{ErrorResponse, IntoErrorResponse, error_kinds};
pub use types::ApiResponse;
pub use utils::{phone, validation};
