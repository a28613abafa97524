//! Identity verification for bearer credentials.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IdentityConfig;

/// Verified identity attributes for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
}

/// Token payload as issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("identity verifier is not configured")]
    NotConfigured,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token carries no email")]
    MissingEmail,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdentityClaim, VerifyError>;
}

/// Verifies HS256 tokens against a shared secret, checking expiry and,
/// when configured, issuer and audience.
pub struct JwtVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &IdentityConfig) -> Self {
        let key = if config.jwt_secret.is_empty() {
            None
        } else {
            Some(DecodingKey::from_secret(config.jwt_secret.as_bytes()))
        };

        let mut validation = Validation::new(Algorithm::HS256);
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self { key, validation }
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaim, VerifyError> {
        let key = self.key.as_ref().ok_or(VerifyError::NotConfigured)?;

        let token_data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?;
        let claims = token_data.claims;

        let email = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(VerifyError::MissingEmail)?;

        Ok(IdentityClaim {
            uid: claims.sub,
            email,
            name: claims.name,
        })
    }
}
