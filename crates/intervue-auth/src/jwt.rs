//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Verification
//! uses zero leeway, so a token is rejected as soon as its `exp` is in the
//! past.
//!
//! # Example
//!
//! ```ignore
//! let principal = authenticate(
//!     parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
//!     &state.jwt_config,
//! )?;
//! ```

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};

use intervue_config::JwtConfig;
use intervue_core::{AppError, AuthFailure};

use crate::claims::Claims;
use crate::principal::Principal;
use crate::roles::Role;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Creates an access token for `subject` valid for the configured lifetime.
pub fn create_access_token(
    subject: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: subject.to_string(),
        role,
        iat: now,
        exp: now + jwt_config.access_token_expiry,
    };

    encode_claims(&claims, jwt_config)
}

/// Signs an arbitrary claim set.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Extracts the token segment of an `Authorization` header value.
///
/// A missing header, a missing `Bearer ` prefix and an empty token all count
/// as "no token".
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthFailure> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthFailure::MissingToken)
}

/// Verifies the signature and expiry of `token` and returns its principal.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Principal, AuthFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => AuthFailure::Expired,
        _ => AuthFailure::Invalid,
    })?;

    Principal::try_from(claims)
}

/// Parses the header and verifies the token in one step.
pub fn authenticate(header: Option<&str>, jwt_config: &JwtConfig) -> Result<Principal, AuthFailure> {
    let token = bearer_token(header)?;
    verify_token(token, jwt_config)
}
