use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use intervue_core::AuthFailure;

use crate::claims::Claims;
use crate::roles::Role;

/// The verified identity attached to one request.
///
/// Only [`crate::jwt::verify_token`] builds one from untrusted input, and only
/// after the signature and expiry checks pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for Principal {
    type Error = AuthFailure;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthFailure::Invalid)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthFailure::Invalid)?;

        Ok(Self {
            subject: claims.sub,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }
}
