//! JWT Token Handler
//! Mission: Issue and verify signed, time-bounded session tokens

use crate::auth::{
    error::AuthError,
    models::{Claims, Role},
};
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

/// A freshly minted token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: usize,
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is the only invalidation mechanism, so it is exact.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.jwt_ttl_hours))
    }

    /// Issue a token for `subject_id` within the `role` partition.
    pub fn issue(&self, subject_id: i64, role: Role) -> Result<IssuedToken> {
        self.issue_at(subject_id, role, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject_id: i64,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken> {
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            sub: subject_id.to_string(),
            role: role.as_str().to_string(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        debug!(
            "Issuing JWT for {}#{}, expires in {}h",
            role,
            subject_id,
            self.ttl.num_hours()
        );

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_in: self.ttl.num_seconds().max(0) as usize,
        })
    }

    /// Sign arbitrary claims with this handler's key.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
                _ => AuthError::InvalidCredential,
            },
        )?;

        Ok(decoded.claims)
    }
}
