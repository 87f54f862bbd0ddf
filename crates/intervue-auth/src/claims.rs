use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::Role;

/// JWT claims for access tokens.
///
/// `role` is a closed enum: a token carrying an unknown role tag fails to
/// decode and is treated as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}
