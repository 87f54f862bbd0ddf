use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use intervue_auth::{Principal, Role, create_access_token};
use intervue_config::{JwtConfig, PasswordConfig};
use intervue_core::{AppError, AuthFailure, hash_password, verify_password};

use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

use super::model::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, User, UserRecord};
use super::store::UserDirectory;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, dto, password_config, jwt_config), fields(email = %dto.email))]
    pub async fn register_user(
        users: &dyn UserDirectory,
        dto: RegisterRequest,
        password_config: &PasswordConfig,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        if users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict("email"));
        }

        let password_hash = hash_password(&dto.password, password_config.cost)?;

        let user = users
            .insert(UserRecord {
                user: User {
                    id: Uuid::new_v4(),
                    name: dto.name,
                    email: dto.email,
                    role: dto.role.unwrap_or(Role::Candidate),
                    created_at: Utc::now(),
                },
                password_hash,
            })
            .await?;

        track_user_registered(user.role.as_str());
        Self::issue(user, jwt_config)
    }

    #[instrument(skip(users, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        users: &dyn UserDirectory,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let Some(record) = users.find_by_email(&dto.email).await? else {
            track_user_login_failure("unknown_email");
            return Err(AuthFailure::InvalidCredentials.into());
        };

        if !verify_password(&dto.password, &record.password_hash)? {
            track_user_login_failure("wrong_password");
            return Err(AuthFailure::InvalidCredentials.into());
        }

        track_user_login_success(record.user.role.as_str());
        Self::issue(record.user, jwt_config)
    }

    #[instrument(skip(users))]
    pub async fn me(users: &dyn UserDirectory, principal: Principal) -> Result<MeResponse, AppError> {
        let user = match Uuid::parse_str(&principal.subject) {
            Ok(id) => users.find_by_id(id).await?,
            Err(_) => None,
        };

        Ok(MeResponse { principal, user })
    }

    fn issue(user: User, jwt_config: &JwtConfig) -> Result<AuthResponse, AppError> {
        let access_token = create_access_token(&user.id.to_string(), user.role, jwt_config)?;
        track_jwt_issued();

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}
