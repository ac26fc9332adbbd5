//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{reset_token::ResetToken, user::User};
use crate::domain::repository::{ResetTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Unique constraint on `users.email` (see migrations)
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const USER_COLUMNS: &str = r#"
    user_id,
    email,
    user_name,
    password_hash,
    user_role,
    created_at,
    updated_at
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                user_name,
                user_name_canonical,
                password_hash,
                user_role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.user_name.original())
        .bind(user.user_name.canonical())
        .bind(user.password.as_phc_string())
        .bind(user.user_role.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_email_or_username(&self, identifier: &str) -> AuthResult<Option<User>> {
        let key = identifier.trim().to_lowercase();

        // Email match first; a user name can never contain '@'
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1 OR user_name_canonical = $1
            ORDER BY (email = $1) DESC
            LIMIT 1
            "#
        ))
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_username(&self, canonical: &str) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE user_name_canonical = $1)",
        )
        .bind(canonical)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_user_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .bind(password.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }

    async fn update_user_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<bool> {
        let updated =
            sqlx::query("UPDATE users SET user_role = $2, updated_at = $3 WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .bind(role.id())
                .bind(Utc::now())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Reset Token Repository Implementation
// ============================================================================

impl ResetTokenRepository for PgAuthRepository {
    async fn create_reset_token(&self, token: &ResetToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (token_hash, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.user_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_reset_token(&self, token_hash: &str) -> AuthResult<Option<ResetToken>> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            r#"
            SELECT token_hash, user_id, expires_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResetTokenRow::into_reset_token))
    }

    async fn delete_reset_token(&self, token_hash: &str) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM password_reset_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted == 1)
    }

    async fn cleanup_expired_reset_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired password reset tokens");

        Ok(deleted)
    }
}

/// Split a unique violation on insert into the two sign-up conflicts
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(EMAIL_UNIQUE_CONSTRAINT) => AuthError::EmailTaken,
                _ => AuthError::UsernameTaken,
            };
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    user_name: String,
    password_hash: String,
    user_role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            user_name: UserName::from_db(&self.user_name),
            password: UserPassword::from_phc_string(self.password_hash)?,
            user_role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ResetTokenRow {
    token_hash: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ResetTokenRow {
    fn into_reset_token(self) -> ResetToken {
        ResetToken {
            token_hash: self.token_hash,
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
