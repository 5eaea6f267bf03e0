// Invite lifecycle service - business logic layer

use chrono::{Duration, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::auth::repository::UserRepository;
use crate::invites::{
    error::InviteError,
    models::{Invite, InviteResponse},
    repository::InviteRepository,
};
use crate::auth::models::Role;

/// Service enforcing invite uniqueness, expiry and single use
#[derive(Clone)]
pub struct InviteService {
    invite_repo: InviteRepository,
    user_repo: UserRepository,
    invite_expires_hours: i64,
}

impl InviteService {
    pub fn new(
        invite_repo: InviteRepository,
        user_repo: UserRepository,
        invite_expires_hours: i64,
    ) -> Self {
        Self {
            invite_repo,
            user_repo,
            invite_expires_hours,
        }
    }

    /// Create an invite for an email that has neither a user account nor an
    /// active invite. An expired unaccepted invite for the same email is
    /// re-issued in place rather than duplicated.
    ///
    /// The token is surfaced through the log; delivering it (email etc.)
    /// is out of scope.
    pub async fn create_invite(
        &self,
        email: &str,
        role: Role,
        requested_by: i32,
    ) -> Result<InviteResponse, InviteError> {
        if self
            .user_repo
            .email_exists(email)
            .await
            .map_err(|e| InviteError::DatabaseError(e.to_string()))?
        {
            return Err(InviteError::UserAlreadyExists);
        }

        let now = Utc::now();
        let token = Uuid::new_v4();
        let expires_at = now + Duration::hours(self.invite_expires_hours);

        let invite = match self.invite_repo.find_unaccepted_by_email(email).await? {
            Some(existing) if existing.is_consumable_at(now) => {
                return Err(InviteError::ActiveInviteExists);
            }
            // Expired but unaccepted: refresh the existing row
            Some(stale) => {
                self.invite_repo
                    .reissue(stale.id, role, token, expires_at)
                    .await?
            }
            None => self.invite_repo.create(email, role, token, expires_at).await?,
        };

        tracing::info!(
            "Invite created for {} with role {} by user {} (token {}, expires {})",
            invite.email,
            invite.role,
            requested_by,
            invite.token,
            invite.expires_at
        );

        Ok(invite.into())
    }

    /// Validate an invite token without consuming it
    pub async fn validate_invite(&self, token: &str) -> Result<Invite, InviteError> {
        // Tokens are UUIDs; anything else cannot match a record
        let token = Uuid::parse_str(token).map_err(|_| InviteError::NotFound)?;

        let invite = self
            .invite_repo
            .find_by_token(token)
            .await?
            .ok_or(InviteError::NotFound)?;

        if invite.is_accepted() {
            return Err(InviteError::AlreadyUsed);
        }
        if invite.is_expired_at(Utc::now()) {
            return Err(InviteError::Expired);
        }

        Ok(invite)
    }

    /// Consume an invite inside an open transaction. Must run only after
    /// the corresponding user row has been created on the same transaction.
    pub async fn mark_invite_as_used_tx(
        &self,
        tx: &mut PgConnection,
        token: Uuid,
    ) -> Result<Invite, InviteError> {
        self.invite_repo.mark_used_tx(tx, token).await
    }
}
