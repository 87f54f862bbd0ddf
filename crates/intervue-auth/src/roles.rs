//! Closed role set and the role authorizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use intervue_core::{AppError, AuthFailure};

use crate::principal::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Interviewer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Candidate, Role::Interviewer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Interviewer => "interviewer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Permits the request when a principal is present and its role is a member
/// of `allowed`.
///
/// An empty `allowed` set denies everyone.
pub fn authorize<'a>(
    principal: Option<&'a Principal>,
    allowed: &[Role],
) -> Result<&'a Principal, AppError> {
    let principal = principal.ok_or(AppError::Unauthenticated(AuthFailure::MissingToken))?;

    if !allowed.contains(&principal.role) {
        return Err(AppError::forbidden(format!(
            "Access denied. This action requires one of the roles: {}",
            allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use intervue_core::ErrorKind;

    fn principal(role: Role) -> Principal {
        let now = Utc::now();
        Principal {
            subject: "user-1".to_string(),
            role,
            issued_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn test_authorize_member_passes_through() {
        let candidate = principal(Role::Candidate);
        let result = authorize(Some(&candidate), &[Role::Candidate, Role::Admin]).unwrap();
        assert_eq!(result, &candidate);
    }

    #[test]
    fn test_authorize_non_member_is_forbidden() {
        let candidate = principal(Role::Candidate);
        let err = authorize(Some(&candidate), &[Role::Interviewer, Role::Admin]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_authorize_without_principal_is_unauthenticated() {
        let err = authorize(None, &Role::ALL).unwrap_err();
        assert!(matches!(
            err,
            AppError::Unauthenticated(AuthFailure::MissingToken)
        ));
    }

    #[test]
    fn test_authorize_empty_set_denies() {
        let admin = principal(Role::Admin);
        assert!(authorize(Some(&admin), &[]).is_err());
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }
}
