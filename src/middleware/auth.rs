use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use intervue_auth::{Principal, Role, authenticate};
use intervue_core::AppError;

use crate::state::AppState;

/// Extractor that verifies the bearer token and yields the caller's principal.
///
/// When a role middleware already verified the token for this request, the
/// stored principal is reused instead of decoding again.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.subject
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0.role == role
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.0.role)
    }
}

/// Verifies the `Authorization` header of `parts`.
pub fn verify_request(parts: &Parts, state: &AppState) -> Result<Principal, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    authenticate(header, &state.jwt_config).map_err(AppError::from)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let principal = verify_request(parts, state)?;
        Ok(AuthUser(principal))
    }
}

/// Principal if a valid token was presented, otherwise anonymous.
#[derive(Debug, Clone, Default)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn role(&self) -> Option<Role> {
        self.0.as_ref().map(AuthUser::role)
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await.ok();
        Ok(OptionalAuthUser(user))
    }
}
