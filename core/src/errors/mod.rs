//! Domain-specific error types and error handling.
//!
//! Mutations never panic or raise past the API boundary: every operation
//! returns [`CoreResult`], and [`CoreError`] converts into the shared
//! [`ErrorResponse`] carrying kind, numeric code and message.

mod types;

pub use types::{ConflictError, NotFoundError, PermissionError, ValidationError};

use thiserror::Error;
use vouch_shared::errors::{error_kinds, ErrorResponse, IntoErrorResponse};

/// Top-level core error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request is currently blocked (anti-spam), {seconds_remaining}s remaining")]
    Throttled { seconds_remaining: i64 },

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("provider failure ({code}): {message}")]
    Upstream { code: i64, message: String },

    #[error("store failure: {message}")]
    Store { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Error kind string for programmatic dispatch
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => error_kinds::VALIDATION,
            CoreError::Throttled { .. } => error_kinds::THROTTLED,
            CoreError::Conflict(_) => error_kinds::CONFLICT,
            CoreError::NotFound(_) => error_kinds::NOT_FOUND,
            CoreError::Permission(_) => error_kinds::PERMISSION,
            CoreError::Upstream { .. } => error_kinds::UPSTREAM,
            CoreError::Store { .. } | CoreError::Internal { .. } => error_kinds::STORE,
        }
    }

    /// Stable numeric code; upstream failures pass the provider code through
    pub fn code(&self) -> i64 {
        match self {
            CoreError::Validation(e) => match e {
                ValidationError::InvalidEmail => 1001,
                ValidationError::InvalidPhone { .. } => 1002,
                ValidationError::InvalidCodeFormat => 1003,
                ValidationError::RequiredField { .. } => 1004,
            },
            CoreError::Throttled { .. } => 1101,
            CoreError::Conflict(e) => match e {
                ConflictError::AlreadyVerifiedOnAccount => 1201,
                ConflictError::VerifiedOnOtherAccount => 1202,
                ConflictError::AlreadyPrimary => 1203,
                ConflictError::ContactNotVerified => 1204,
                ConflictError::CodeExpired => 1205,
                ConflictError::UsernameTaken => 1206,
            },
            CoreError::NotFound(e) => match e {
                NotFoundError::ContactNotFound => 1301,
                NotFoundError::NoVerificationMatch => 1302,
                NotFoundError::AccountNotFound => 1303,
                NotFoundError::CodeMismatch => 1304,
            },
            CoreError::Permission(e) => match e {
                PermissionError::PrimaryContactRemoval => 1401,
                PermissionError::InvalidCredentials => 1402,
                PermissionError::AccountDeactivated { .. } => 1403,
                PermissionError::SessionRevoked => 1404,
                PermissionError::SessionExpired => 1405,
            },
            CoreError::Upstream { code, .. } => *code,
            CoreError::Store { .. } => 1601,
            CoreError::Internal { .. } => 1602,
        }
    }
}

impl From<CoreError> for ErrorResponse {
    fn from(err: CoreError) -> Self {
        let response = ErrorResponse::new(err.kind(), err.code(), err.to_string());
        match err {
            CoreError::Throttled { seconds_remaining } => {
                response.add_detail("seconds_remaining", seconds_remaining)
            }
            _ => response,
        }
    }
}

impl IntoErrorResponse for CoreError {
    fn to_error_response(&self) -> ErrorResponse {
        self.clone().into()
    }
}
