//! Role-based authorization middleware for Axum
//!
//! Two ways to gate a route on the caller's role:
//! 1. Layer-based middleware using [`require_roles`] and its wrappers
//! 2. Helper functions ([`check_role`], [`check_any_role`]) inside handlers
//!
//! The middleware stores the verified [`AuthUser`] in the request extensions,
//! so the handler's own `AuthUser` extractor does not decode the token again.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use intervue_auth::{Role, authorize};
use intervue_core::AppError;

use crate::middleware::auth::{AuthUser, verify_request};
use crate::state::AppState;

/// Middleware function that checks the authenticated user has one of the
/// allowed roles.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let protected_routes = Router::new()
///     .route("/review", get(review_handler))
///     .layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, &[Role::Admin])
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &'static [Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let principal = verify_request(&parts, &state)?;
    authorize(Some(&principal), allowed_roles)?;

    parts.extensions.insert(AuthUser(principal));
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, &Role::ALL).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_candidate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, &[Role::Candidate]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Interviewers and admins.
///
/// # Example
///
/// ```rust,ignore
/// let authoring_routes = Router::new()
///     .route("/", post(create_question))
///     .layer(middleware::from_fn_with_state(state.clone(), require_interviewer));
/// ```
pub async fn require_interviewer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, &[Role::Interviewer, Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Helper function to check a user's role in controller logic
///
/// # Example
///
/// ```rust,ignore
/// pub async fn handler(auth_user: AuthUser) -> Result<Json<Response>, AppError> {
///     check_role(&auth_user, Role::Admin)?;
///     // Handler logic
/// }
/// ```
pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    check_any_role(auth_user, &[required_role])
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    authorize(Some(&auth_user.0), allowed_roles).map(|_| ())
}

/// Whether the caller may see interviewer-only material.
pub fn is_reviewer(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Interviewer | Role::Admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use intervue_auth::Principal;
    use intervue_core::ErrorKind;

    fn user(role: Role) -> AuthUser {
        let now = Utc::now();
        AuthUser(Principal {
            subject: "user-1".to_string(),
            role,
            issued_at: now,
            expires_at: now + Duration::hours(1),
        })
    }

    #[test]
    fn test_check_role_matches_exact_role() {
        assert!(check_role(&user(Role::Admin), Role::Admin).is_ok());

        let err = check_role(&user(Role::Candidate), Role::Admin).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_check_any_role() {
        let allowed = [Role::Interviewer, Role::Admin];
        assert!(check_any_role(&user(Role::Interviewer), &allowed).is_ok());
        assert!(check_any_role(&user(Role::Admin), &allowed).is_ok());
        assert!(check_any_role(&user(Role::Candidate), &allowed).is_err());
        assert!(check_any_role(&user(Role::Admin), &[]).is_err());
    }

    #[test]
    fn test_is_reviewer() {
        assert!(!is_reviewer(None));
        assert!(!is_reviewer(Some(Role::Candidate)));
        assert!(is_reviewer(Some(Role::Interviewer)));
        assert!(is_reviewer(Some(Role::Admin)));
    }
}
