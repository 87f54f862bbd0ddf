//! Account models and DTOs.
//!
//! - [`User`]: public view of an account
//! - [`RegisterRequest`] / [`LoginRequest`]: validated request bodies
//! - [`AuthResponse`]: token plus user, returned by register and login

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use intervue_auth::{Principal, Role};

use crate::validator::{FieldRule, RuleSet, Validated};

/// Roles a client may pick for itself at registration.
pub const SELF_SERVICE_ROLES: &[&str] = &["candidate", "interviewer"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A stored account. Never serialized.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `candidate`.
    pub role: Option<Role>,
}

static REGISTER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new("register")
        .field(FieldRule::new("name").trim().required().length(2, 100))
        .field(FieldRule::new("email").trim().lowercase().required().email())
        .field(FieldRule::new("password").required().length(8, 128))
        .field(FieldRule::new("role").trim().lowercase().one_of(SELF_SERVICE_ROLES))
});

impl Validated for RegisterRequest {
    fn rules() -> &'static RuleSet {
        &REGISTER_RULES
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

static LOGIN_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new("login")
        .field(FieldRule::new("email").trim().lowercase().required().email())
        .field(FieldRule::new("password").required())
});

impl Validated for LoginRequest {
    fn rules() -> &'static RuleSet {
        &LOGIN_RULES
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub principal: Principal,
    /// `None` when the subject has no account here (e.g. an operator token).
    pub user: Option<User>,
}
