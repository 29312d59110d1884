//! JWT-backed session token service.
//!
//! Access tokens are HS256 JWTs; refresh tokens are opaque digests.
//! Verification honors the account's logout-all watermark: a token
//! minted before the watermark is revoked no matter how much lifetime
//! it has left.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use vouch_core::domain::entities::account::Account;
use vouch_core::domain::value_objects::session::{SessionClaims, SessionPair};
use vouch_core::errors::{CoreError, CoreResult, PermissionError};
use vouch_core::services::session::SessionTokenService;

/// Session token configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
    /// Access token lifetime in minutes
    pub access_expiry_minutes: i64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "vouch".to_string(),
            audience: "vouch-api".to_string(),
            access_expiry_minutes: 15,
        }
    }
}

/// Claims structure for the JWT payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
    jti: String,
}

/// JWT session service
pub struct JwtSessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: SessionConfig,
}

impl JwtSessionService {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.leeway = 0;
        validation
    }

    /// Opaque refresh token derived from the token id and the secret
    fn refresh_token(&self, jti: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(jti.as_bytes());
        hasher.update(self.config.secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl SessionTokenService for JwtSessionService {
    async fn issue(&self, account: &Account) -> CoreResult<SessionPair> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.access_expiry_minutes);
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: account.id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: jti.clone(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CoreError::Internal {
                message: format!("token encoding failed: {}", e),
            })?;

        Ok(SessionPair {
            access_token,
            refresh_token: self.refresh_token(&jti),
            access_expires_at: expires_at,
        })
    }

    async fn verify_access(&self, token: &str, account: &Account) -> CoreResult<SessionClaims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    CoreError::Permission(PermissionError::SessionExpired)
                }
                _ => CoreError::Permission(PermissionError::SessionRevoked),
            },
        )?;

        if data.claims.sub != account.id.to_string() {
            return Err(PermissionError::SessionRevoked.into());
        }

        let issued_at = timestamp(data.claims.iat)?;
        let expires_at = timestamp(data.claims.exp)?;

        // The logout-all watermark revokes everything minted before it
        if let Some(watermark) = account.last_logout_all {
            if issued_at < watermark {
                return Err(PermissionError::SessionRevoked.into());
            }
        }

        Ok(SessionClaims {
            account_id: account.id,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(secs: i64) -> CoreResult<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| CoreError::Permission(PermissionError::SessionRevoked))
}
