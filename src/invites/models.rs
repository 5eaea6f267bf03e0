// Invite data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::Role;

/// Invite database model.
///
/// Invites are never deleted; a consumed invite keeps its `accepted_at`
/// timestamp as an audit trail and an expired one simply stops validating.
#[derive(Debug, Clone, FromRow)]
pub struct Invite {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// An invite is consumable iff it is unaccepted and unexpired
    pub fn is_consumable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_accepted() && !self.is_expired_at(now)
    }
}

/// Invite creation request DTO (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInviteRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    pub role: Role,
}

/// Invite response DTO returned to the inviting admin
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteResponse {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<Invite> for InviteResponse {
    fn from(invite: Invite) -> Self {
        Self {
            id: invite.id,
            email: invite.email,
            role: invite.role,
            token: invite.token,
            expires_at: invite.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invite_expiring_at(expires_at: DateTime<Utc>, accepted_at: Option<DateTime<Utc>>) -> Invite {
        Invite {
            id: 1,
            email: "bob@x.com".to_string(),
            role: Role::Staff,
            token: Uuid::new_v4(),
            expires_at,
            accepted_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_invite_is_consumable() {
        let now = Utc::now();
        let invite = invite_expiring_at(now + Duration::hours(48), None);
        assert!(invite.is_consumable_at(now));
    }

    #[test]
    fn test_accepted_invite_is_not_consumable() {
        let now = Utc::now();
        let invite = invite_expiring_at(now + Duration::hours(48), Some(now));
        assert!(invite.is_accepted());
        assert!(!invite.is_consumable_at(now));
    }

    #[test]
    fn test_expired_invite_is_not_consumable() {
        let now = Utc::now();
        let invite = invite_expiring_at(now - Duration::hours(1), None);
        assert!(invite.is_expired_at(now));
        assert!(!invite.is_consumable_at(now));
    }

    // Expiry is exclusive: an invite expiring exactly now is already expired
    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let invite = invite_expiring_at(now, None);
        assert!(invite.is_expired_at(now));
        assert!(!invite.is_consumable_at(now));
    }
}
