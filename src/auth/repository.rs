// Database repository for users

use sqlx::{PgConnection, PgPool};

use crate::auth::{
    error::AuthError,
    models::{Role, User},
};

/// User repository for database operations.
///
/// All lookups filter out soft-deleted rows; a deleted user is invisible
/// to every auth flow.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email (exact match, case-sensitive as stored)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, status, is_deleted, created_at, updated_at \
             FROM users WHERE email = $1 AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, status, is_deleted, created_at, updated_at \
             FROM users WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether a live (non-deleted) user with this email exists
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_deleted = FALSE)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Create a user inside an open transaction. Registration pairs this
    /// with marking the invite used, so both commit or neither does.
    pub async fn create_user_tx(
        &self,
        tx: &mut PgConnection,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, password_hash, role, status, is_deleted, created_at, updated_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(tx)
        .await
        .map_err(|e| {
            // A unique violation means the email is already taken
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Pool handle for callers that need to open a transaction spanning
    /// this repository and others.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
