//! Twilio Verify API client.
//!
//! Implements the [`SmsVerifyProvider`] seam against Twilio's Verify v2
//! service. Twilio owns code generation, delivery and matching; this
//! client maps its responses to [`ProviderStatus`], passing Twilio's
//! own error codes through unchanged.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use vouch_core::errors::CoreError;
use vouch_core::services::verification::traits::{
    provider_codes, ProviderStatus, SmsChannel, SmsVerifyProvider,
};
use vouch_shared::utils::phone::mask_phone_number;

const VERIFY_BASE_URL: &str = "https://verify.twilio.com/v2";

/// Twilio Verify service configuration
#[derive(Debug, Clone)]
pub struct TwilioVerifyConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// Verify Service SID
    pub service_sid: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TwilioVerifyConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| CoreError::Internal {
                message: format!("{} not set", name),
            })
        };
        Ok(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            service_sid: var("TWILIO_VERIFY_SERVICE_SID")?,
            request_timeout_secs: std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    code: Option<i64>,
    message: Option<String>,
}

/// Twilio Verify API client
pub struct TwilioVerifyService {
    client: reqwest::Client,
    config: TwilioVerifyConfig,
}

impl TwilioVerifyService {
    pub fn new(config: TwilioVerifyConfig) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CoreError::Internal {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        info!("Twilio Verify client initialized");
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(TwilioVerifyConfig::from_env()?)
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<ProviderStatus, CoreError> {
        let url = format!(
            "{}/Services/{}/{}",
            VERIFY_BASE_URL, self.config.service_sid, path
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| CoreError::Upstream {
                code: provider_codes::TRANSPORT_FAILURE,
                message: format!("request to verification provider failed: {}", e),
            })?;

        if response.status().is_success() {
            let body: VerificationResponse =
                response.json().await.map_err(|e| CoreError::Upstream {
                    code: provider_codes::TRANSPORT_FAILURE,
                    message: format!("malformed provider response: {}", e),
                })?;
            debug!(status = %body.status, "provider response");
            Ok(match body.status.as_str() {
                "approved" => ProviderStatus::Approved,
                "pending" => ProviderStatus::Pending,
                _ => ProviderStatus::Failed {
                    code: provider_codes::TRANSPORT_FAILURE,
                },
            })
        } else {
            // Twilio application errors carry their own code space
            // (e.g. 20404 unknown verification, 60202/60203 attempt caps)
            let error: TwilioErrorResponse =
                response.json().await.unwrap_or(TwilioErrorResponse {
                    code: None,
                    message: None,
                });
            let code = error.code.unwrap_or(provider_codes::TRANSPORT_FAILURE);
            warn!(
                code = code,
                message = error.message.as_deref().unwrap_or(""),
                "provider rejected the request"
            );
            Ok(ProviderStatus::Failed { code })
        }
    }
}

#[async_trait]
impl SmsVerifyProvider for TwilioVerifyService {
    async fn send_code(
        &self,
        number: &str,
        channel: SmsChannel,
    ) -> Result<ProviderStatus, CoreError> {
        debug!(
            number = %mask_phone_number(number),
            channel = channel.as_str(),
            "starting provider verification"
        );
        self.post_form("Verifications", &[("To", number), ("Channel", channel.as_str())])
            .await
    }

    async fn check_code(&self, number: &str, code: &str) -> Result<ProviderStatus, CoreError> {
        debug!(
            number = %mask_phone_number(number),
            "checking provider verification code"
        );
        self.post_form("VerificationCheck", &[("To", number), ("Code", code)])
            .await
    }
}
