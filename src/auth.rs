/// Authentication
///
/// Passwords are stored as argon2 PHC strings. Sessions are stateless
/// HS256 bearer tokens carrying the user's id and role; handlers receive
/// the caller through the [`AuthUser`], [`VendorUser`] and
/// [`CustomerUser`] extractors.

use std::fmt;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::errors::ApiError;
use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_ALGORITHM: &str = "HS256";

/// Longest accepted token lifetime, ten years
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Hashes a plain-text password with a random salt
///
/// ### Errors
///
/// Returns an error if argon2 fails to hash the password
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored argon2 hash
///
/// ### Returns
///
/// `Ok(false)` when the password does not match
///
/// ### Errors
///
/// Returns an error if the stored hash cannot be parsed
#[instrument(skip(stored_hash, password))]
pub fn verify_password(stored_hash: &str, password: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Stored password hash is invalid: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Failed to verify password: {}", e)),
    }
}

/// The payload of a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("signing key rejected: {0}")]
    Key(String),
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Signs and verifies bearer tokens
#[derive(Clone)]
pub struct TokenKeys {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenKeys {
    /// Creates keys from a shared secret; tokens live for `ttl_hours`
    ///
    /// The lifetime is clamped to `1..=MAX_TOKEN_TTL_HOURS`.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS)),
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| TokenError::Key(e.to_string()))
    }

    /// Issues a token for `user_id` valid from now
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issues a token as if the current time were `now`
    pub fn issue_at(&self, user_id: &str, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let header = TokenHeader {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            user_id: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or(TokenError::ExpiryOutOfRange)?
                .timestamp(),
        };
        let header_part = encode_part(&header)?;
        let claims_part = encode_part(&claims)?;
        let signing_input = format!("{}.{}", header_part, claims_part);

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Verifies a token and returns its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the current time were `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_part), Some(claims_part), Some(signature_part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: TokenHeader = decode_part(header_part)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_part)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header_part.as_bytes());
        mac.update(b".");
        mac.update(claims_part.as_bytes());
        mac.verify_slice(&signature).map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_part(claims_part)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

fn encode_part<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|_| TokenError::Malformed)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_part<T: for<'de> Deserialize<'de>>(part: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(part).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// The caller identified by a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let keys = TokenKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized("Invalid token".to_string())
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}

fn require_role(user: AuthUser, role: Role) -> Result<AuthUser, ApiError> {
    if user.role == role {
        Ok(user)
    } else {
        debug!(user_id = %user.user_id, role = %user.role, "Role check failed, needed {}", role);
        Err(ApiError::Forbidden("Insufficient permissions".to_string()))
    }
}

/// An authenticated caller with the VENDOR role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorUser(pub AuthUser);

impl<S> FromRequestParts<S> for VendorUser
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, Role::Vendor).map(VendorUser)
    }
}

/// An authenticated caller with the CUSTOMER role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUser(pub AuthUser);

impl<S> FromRequestParts<S> for CustomerUser
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user, Role::Customer).map(CustomerUser)
    }
}

#[cfg(test)]
mod tests;
