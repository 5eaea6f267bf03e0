// Authentication and authorization middleware for protected routes

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::{Role, UserStatus},
};
use crate::AppState;

/// Authenticated identity attached to a request after token verification
/// and live status check
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

/// Authentication middleware.
///
/// Verifies the bearer access token, then re-fetches the user row so that
/// role and status reflect the store, not a stale token payload. Tokens
/// have no revocation list; this live re-check is the only point where a
/// deactivated or deleted account loses access before token expiry.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let token = bearer_token(request.headers()).map_err(|e| {
        warn!("Authentication failed for {}: {}", endpoint, e);
        e
    })?;

    let claims = state.token_service.validate_access_token(token)?;

    // The token only identifies which row to re-check
    let user = state
        .user_repo
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(
                "Token for user {} no longer resolves to a user (endpoint {})",
                claims.sub, endpoint
            );
            AuthError::InvalidToken
        })?;

    if user.status == UserStatus::Inactive {
        warn!("Deactivated user {} attempted {}", user.id, endpoint);
        return Err(AuthError::AccountDeactivated);
    }

    debug!("Authenticated user {} for {}", user.id, endpoint);

    request.extensions_mut().insert(Principal {
        user_id: user.id,
        email: user.email,
        role: user.role,
        status: user.status,
    });

    Ok(next.run(request).await)
}

/// Role-based authorization gate. Must run after `authenticate`; a missing
/// principal means the layers are mis-ordered and is treated as
/// unauthenticated rather than allowed through.
#[derive(Debug, Clone)]
pub struct RequireRole {
    allowed: Vec<Role>,
}

impl RequireRole {
    pub fn new(allowed: Vec<Role>) -> Self {
        Self { allowed }
    }

    /// Admin-only gate
    pub fn admin() -> Self {
        Self::new(vec![Role::Admin])
    }

    /// Admin-or-manager gate
    pub fn managers() -> Self {
        Self::new(vec![Role::Admin, Role::Manager])
    }

    /// Whether a role is in the allowed set
    pub fn permits(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Middleware function enforcing the role set
    pub async fn middleware(
        self,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, AuthError> {
        let endpoint = request.uri().path().to_string();

        let principal = request
            .extensions()
            .get::<Principal>()
            .ok_or(AuthError::NotAuthenticated)?;

        if !self.permits(principal.role) {
            warn!(
                "Authorization failed: user_id={}, role={}, endpoint={}",
                principal.user_id, principal.role, endpoint
            );
            return Err(AuthError::InsufficientPermissions {
                role: principal.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            principal.user_id, principal.role, endpoint
        );
        Ok(next.run(request).await)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)
    }
}
