use learnhub_auth::{TokenPair, TokenService};
use learnhub_core::{AppError, hash_password, verify_password};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use crate::metrics;
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterRequestDto};
use crate::modules::users::model::{USER_COLUMNS, User};
use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    /// Creates an account with role USER. Roles are only changed through the
    /// SUPER_ADMIN endpoint or the CLI.
    #[instrument(skip(db, dto), fields(user.email = %dto.email, db.operation = "INSERT", db.table = "users"))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, phone, password, image, role)
             VALUES ($1, $2, LOWER($3), $4, $5, $6, 'USER')
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&password_hash)
        .bind(&dto.image)
        .fetch_one(db)
        .await
        .map_err(|e| {
            let err = AppError::from_db(e, "User");
            if err.status.is_server_error() {
                error!(error = %err.error, "Database error registering user");
            } else {
                warn!(user.email = %dto.email, "Registration rejected: {}", err.error);
            }
            err
        })?;

        metrics::track_user_registered();
        info!(user.id = %user.id, "User registered");

        Ok(user)
    }

    fn issue_tokens(tokens: &TokenService, user: &User) -> Result<TokenPair, AppError> {
        let pair = tokens.issue_pair(user.id, user.role).map_err(|e| {
            error!(error = %e, user.id = %user.id, "Failed to issue tokens");
            AppError::internal_error("Failed to issue tokens")
        })?;
        metrics::track_jwt_issued("access");
        metrics::track_jwt_issued("refresh");
        Ok(pair)
    }

    #[instrument(skip(db, tokens, dto), fields(user.email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(credentials) = UserService::find_credentials_by_email(db, &dto.email).await?
        else {
            debug!("Login failed: unknown email");
            metrics::track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            debug!(user.id = %credentials.id, "Login failed: wrong password");
            metrics::track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let user = UserService::get_user(db, credentials.id).await?;
        let pair = Self::issue_tokens(tokens, &user)?;

        metrics::track_user_login_success(user.role.as_str());
        info!(user.id = %user.id, user.role = %user.role, "User logged in");

        Ok(LoginResponse { tokens: pair, user })
    }

    /// Exchanges a refresh token for a new pair. The role is re-read from
    /// the database so a role change takes effect on the next refresh.
    #[instrument(skip(db, tokens, refresh_token))]
    pub async fn refresh_tokens(
        db: &PgPool,
        tokens: &TokenService,
        refresh_token: &str,
    ) -> Result<LoginResponse, AppError> {
        let claims = tokens.verify_refresh(refresh_token).map_err(|e| {
            debug!(error = %e, "Refresh token rejected");
            AppError::unauthorized("Invalid or expired refresh token")
        })?;

        let user = UserService::get_user(db, claims.id).await.map_err(|e| {
            if e.status.is_client_error() {
                AppError::unauthorized("User no longer exists")
            } else {
                e
            }
        })?;

        let pair = Self::issue_tokens(tokens, &user)?;
        info!(user.id = %user.id, "Tokens refreshed");

        Ok(LoginResponse { tokens: pair, user })
    }
}
