use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use eduplatform_auth::{Principal, Role, issue_token};
use eduplatform_config::JwtConfig;
use eduplatform_core::{AppError, hash_password, verify_password};
use eduplatform_models::auth::{AuthResponse, CurrentUser, LoginDto, RegisterDto};
use eduplatform_models::users::User;

use crate::metrics::{
    track_token_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

const USER_COLUMNS: &str = "id, name, email, password, role, instructor_id, created_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: RegisterDto,
    ) -> Result<AuthResponse, AppError> {
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await
            .context("Failed to look up user by email")
            .map_err(AppError::database)?
            .is_some();

        if exists {
            return Err(AppError::bad_request(anyhow!("User already exists")));
        }

        let role = dto.requested_role();
        let instructor_id = match role {
            Role::Student => Some(Self::require_instructor(db, dto.instructor_id).await?),
            Role::Instructor | Role::Admin => None,
        };

        let hashed = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role, instructor_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&hashed)
        .bind(role)
        .bind(instructor_id)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request(anyhow!("User already exists"))
            }
            _ => AppError::database(anyhow::Error::new(e).context("Failed to insert user")),
        })?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        track_user_registered(user.role.as_str());

        Self::auth_response(&user, jwt_config)
    }

    /// A student must be mapped to an existing instructor.
    async fn require_instructor(db: &PgPool, instructor_id: Option<Uuid>) -> Result<Uuid, AppError> {
        let id = instructor_id.ok_or_else(|| {
            AppError::bad_request(anyhow!("instructorId is required for student registration"))
        })?;

        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to look up instructor")
            .map_err(AppError::database)?;

        match role {
            Some(Role::Instructor) => Ok(id),
            _ => Err(AppError::bad_request(anyhow!("Invalid instructorId"))),
        }
    }

    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginDto,
    ) -> Result<AuthResponse, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        let authenticated = user.filter(|user| {
            verify_password(&dto.password, &user.password).unwrap_or_else(|e| {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                false
            })
        });

        let Some(user) = authenticated else {
            track_user_login_failure();
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        track_user_login_success(user.role.as_str());
        Self::auth_response(&user, jwt_config)
    }

    #[instrument(skip(db))]
    pub async fn current_user(db: &PgPool, user_id: Uuid) -> Result<CurrentUser, AppError> {
        sqlx::query_as::<_, CurrentUser>("SELECT id, name, email, role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch current user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    fn auth_response(user: &User, jwt_config: &JwtConfig) -> Result<AuthResponse, AppError> {
        let token = issue_token(&Principal::new(user.id.to_string(), user.role), jwt_config)?;
        track_token_issued(user.role.as_str());

        Ok(AuthResponse {
            legacy_id: user.id,
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token,
        })
    }
}
