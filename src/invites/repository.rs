// Database repository for invites

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::models::Role;
use crate::invites::{error::InviteError, models::Invite};

/// Invite repository for database operations
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an invite by its token
    pub async fn find_by_token(&self, token: Uuid) -> Result<Option<Invite>, InviteError> {
        let invite = sqlx::query_as::<_, Invite>(
            "SELECT id, email, role, token, expires_at, accepted_at, created_at \
             FROM invites WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    /// Find the unaccepted invite for an email, if any. The partial unique
    /// index guarantees at most one such row.
    pub async fn find_unaccepted_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Invite>, InviteError> {
        let invite = sqlx::query_as::<_, Invite>(
            "SELECT id, email, role, token, expires_at, accepted_at, created_at \
             FROM invites WHERE email = $1 AND accepted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    /// Insert a fresh invite. A unique violation on the partial index means
    /// a concurrent request created an unaccepted invite first.
    pub async fn create(
        &self,
        email: &str,
        role: Role,
        token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invite, InviteError> {
        let invite = sqlx::query_as::<_, Invite>(
            "INSERT INTO invites (email, role, token, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, role, token, expires_at, accepted_at, created_at",
        )
        .bind(email)
        .bind(role)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return InviteError::ActiveInviteExists;
                }
            }
            InviteError::DatabaseError(e.to_string())
        })?;

        Ok(invite)
    }

    /// Re-issue an expired unaccepted invite in place with a new token,
    /// role and expiry. Keeps the partial unique index satisfied without
    /// piling up stale rows for the same email.
    pub async fn reissue(
        &self,
        id: i32,
        role: Role,
        token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Invite, InviteError> {
        let invite = sqlx::query_as::<_, Invite>(
            "UPDATE invites \
             SET role = $2, token = $3, expires_at = $4, created_at = NOW() \
             WHERE id = $1 AND accepted_at IS NULL \
             RETURNING id, email, role, token, expires_at, accepted_at, created_at",
        )
        .bind(id)
        .bind(role)
        .bind(token)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?
        // The row was accepted between our check and the update
        .ok_or(InviteError::ActiveInviteExists)?;

        Ok(invite)
    }

    /// Mark an invite as used inside an open transaction. `accepted_at`
    /// transitions null -> set exactly once; a second call finds no
    /// matching row.
    pub async fn mark_used_tx(
        &self,
        tx: &mut PgConnection,
        token: Uuid,
    ) -> Result<Invite, InviteError> {
        let invite = sqlx::query_as::<_, Invite>(
            "UPDATE invites SET accepted_at = NOW() \
             WHERE token = $1 AND accepted_at IS NULL \
             RETURNING id, email, role, token, expires_at, accepted_at, created_at",
        )
        .bind(token)
        .fetch_optional(tx)
        .await?
        .ok_or(InviteError::AlreadyUsed)?;

        Ok(invite)
    }
}
