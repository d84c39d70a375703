//! Signed identity assertions.
//!
//! Stateless HS256 tokens: the only server-side state is the signing secret,
//! handed to [`TokenService::new`] once at startup and never rotated at
//! runtime. Verification is all-or-nothing; no claim is read before the
//! signature and expiry check out. Issued tokens live until natural expiry;
//! there is no revocation and no session store.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Why a bearer credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingToken,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token could not be parsed")]
    Malformed,
}

/// The verified caller identity attached to a request by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub name: String,
}

/// Claim set carried by an issued assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owner's stable identifier.
    pub sub: String,
    /// Owner's name at issuance.
    pub name: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies signed, time-bounded identity assertions.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    /// Build a service around the process-wide signing secret.
    ///
    /// `ttl_secs` is the fixed window from issuance to expiry; the service
    /// configuration defaults it to one hour.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would keep just-expired
        // tokens alive.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Issue an assertion for `identity`, expiring `ttl_secs` from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: identity.name.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify an assertion and resolve the caller identity.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    _ => AuthError::Malformed,
                }
            })?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Malformed)?;
        Ok(Identity {
            user_id,
            name: data.claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            name: "alice".to_string(),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let service = TokenService::new("s3cret", 3600);
        let id = identity();
        let token = service.issue(&id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new("s3cret", -60);
        let token = service.issue(&identity()).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::Expired);
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = TokenService::new("s3cret", 3600);
        let verifier = TokenService::new("another-secret", 3600);
        let token = issuer.issue(&identity()).unwrap();
        assert_eq!(
            verifier.verify(&token).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let service = TokenService::new("s3cret", 3600);
        assert_eq!(
            service.verify("definitely-not-a-token").unwrap_err(),
            AuthError::Malformed
        );
        assert_eq!(service.verify("").unwrap_err(), AuthError::Malformed);
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let service = TokenService::new("s3cret", 3600);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            name: "alice".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &service.encoding).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::Malformed);
    }
}
