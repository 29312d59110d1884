//! External SMS verification provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Delivery channel for the SMS verification provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsChannel {
    /// Code delivered by text message
    #[default]
    Sms,
    /// Code read out over a voice call
    Call,
}

impl SmsChannel {
    /// Parse a caller-provided channel parameter; unknown values fall
    /// back to SMS
    pub fn from_param(param: &str) -> Self {
        match param.to_ascii_lowercase().as_str() {
            "call" => SmsChannel::Call,
            _ => SmsChannel::Sms,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SmsChannel::Sms => "sms",
            SmsChannel::Call => "call",
        }
    }
}

/// Outcome reported by the provider for a send or check request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    /// The code matched; ownership of the number is proven
    Approved,
    /// The verification is still pending (submitted code did not match)
    Pending,
    /// The provider rejected the request with its own error code
    Failed { code: i64 },
}

/// Provider error codes with dedicated handling
pub mod provider_codes {
    /// Sentinel for transport-level failures outside the provider's
    /// own code space
    pub const TRANSPORT_FAILURE: i64 = 0;
    /// No verification process found (expired, never started, or the
    /// code was already used)
    pub const VERIFICATION_NOT_FOUND: i64 = 20404;
    /// Maximum check attempts reached
    pub const MAX_CHECK_ATTEMPTS: i64 = 60202;
    /// Maximum send attempts reached
    pub const MAX_SEND_ATTEMPTS: i64 = 60203;
}

/// Trait for the external SMS verification provider
///
/// The provider owns code generation, delivery and matching for phone
/// numbers. Transport-level failures surface as [`CoreError::Upstream`]
/// with the provider's numeric error code.
#[async_trait]
pub trait SmsVerifyProvider: Send + Sync {
    /// Start a verification for the number over the given channel
    async fn send_code(
        &self,
        number: &str,
        channel: SmsChannel,
    ) -> Result<ProviderStatus, CoreError>;

    /// Check a code the user received for the number
    async fn check_code(&self, number: &str, code: &str) -> Result<ProviderStatus, CoreError>;
}
