// Authentication service - business logic layer

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, TokenPairResponse, UserResponse, UserStatus},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};
use crate::invites::InviteService;

/// Authentication service coordinating login, invite-based registration
/// and token refresh
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    invite_service: InviteService,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        invite_service: InviteService,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repo,
            invite_service,
            token_service,
        }
    }

    /// Login with email and password.
    ///
    /// "No such account" and "wrong password" deliberately collapse into the
    /// same InvalidCredentials error; a deactivated account is Forbidden.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.status == UserStatus::Inactive {
            return Err(AuthError::AccountDeactivated);
        }

        if !PasswordService::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        tracing::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Register a new user via an invite token.
    ///
    /// Email and role come from the invite record, never from the client, so
    /// a caller cannot inject a higher role. The user insert and the invite
    /// consumption run inside one transaction: both commit or neither does.
    pub async fn register_via_invite(
        &self,
        token: &str,
        name: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        let invite = self.invite_service.validate_invite(token).await?;

        let password_hash = PasswordService::hash_password(password)?;

        let mut tx = self.user_repo.pool().begin().await?;

        let user = self
            .user_repo
            .create_user_tx(&mut *tx, name, &invite.email, &password_hash, invite.role)
            .await?;

        self.invite_service
            .mark_invite_as_used_tx(&mut *tx, invite.token)
            .await?;

        tx.commit().await?;

        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        tracing::info!(
            "User {} registered via invite {} with role {}",
            user.id,
            invite.token,
            user.role
        );

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Rotate a refresh token into a fresh access/refresh pair.
    ///
    /// The user is re-fetched live: a deleted account fails Unauthorized and
    /// a deactivated one Forbidden, regardless of what the token claims.
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<TokenPairResponse, AuthError> {
        let claims = self
            .token_service
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if user.status == UserStatus::Inactive {
            return Err(AuthError::AccountDeactivated);
        }

        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
        })
    }

    /// Public projection of the current user for the /me endpoint
    pub async fn get_current_user(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(user.into())
    }
}
