//! Domain-specific error types for verification and account operations
//!
//! Each variant maps to a stable numeric code through
//! [`crate::errors::CoreError::code`]; upstream provider failures carry
//! the provider's own numeric code instead.

use thiserror::Error;

/// Input validation failures, rejected before any state change
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email address format is invalid")]
    InvalidEmail,

    #[error("no valid phone number could be processed: {number}")]
    InvalidPhone { number: String },

    #[error("the verification code format is invalid (numeric, 6 digits)")]
    InvalidCodeFormat,

    #[error("required field: {field}")]
    RequiredField { field: String },
}

/// State conflicts between the request and existing records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    #[error("this address is already verified on your account")]
    AlreadyVerifiedOnAccount,

    #[error("this address is already verified on another account")]
    VerifiedOnOtherAccount,

    #[error("this contact is already set as primary")]
    AlreadyPrimary,

    #[error("the contact must be verified before it can become primary")]
    ContactNotVerified,

    #[error("the verification code has expired, request a new one")]
    CodeExpired,

    #[error("an account with this username already exists")]
    UsernameTaken,
}

/// Lookup failures: no matching contact, token or account
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("no contact record available for this action")]
    ContactNotFound,

    #[error("no verification process found for this address and code combination")]
    NoVerificationMatch,

    #[error("account not found")]
    AccountNotFound,

    #[error("the verification code does not match")]
    CodeMismatch,
}

/// Disallowed operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("primary contacts cannot be removed")]
    PrimaryContactRemoval,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("this account has been deactivated (reason {reason})")]
    AccountDeactivated { reason: i32 },

    #[error("session token is no longer valid")]
    SessionRevoked,

    #[error("session token has expired")]
    SessionExpired,
}
