// HTTP handlers for authentication and invite endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use validator::Validate;

use crate::audit;
use crate::auth::{
    error::AuthError,
    middleware::Principal,
    models::{
        AuthResponse, LoginRequest, RefreshRequest, RegisterViaInviteRequest, TokenPairResponse,
        UserResponse,
    },
};
use crate::invites::{CreateInviteRequest, InviteResponse};
use crate::AppState;

/// Login with email and password
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request.validate()?;

    let response = state.auth_service.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// Invite a user by email with a predetermined role (admin only)
/// POST /api/auth/invite
#[utoipa::path(
    post,
    path = "/api/auth/invite",
    request_body = CreateInviteRequest,
    responses(
        (status = 201, description = "Invite created", body = InviteResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Insufficient permissions"),
        (status = 409, description = "User or active invite already exists")
    ),
    tag = "auth"
)]
pub async fn invite_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), AuthError> {
    request.validate()?;

    let invite = state
        .invite_service
        .create_invite(&request.email, request.role, principal.user_id)
        .await?;

    audit::log_action(
        &state.db,
        principal.user_id,
        "INVITE_USER",
        json!({
            "invitedEmail": invite.email,
            "invitedRole": invite.role,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(invite)))
}

/// Register a new user via an invite token
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterViaInviteRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invite already used or expired"),
        (status = 404, description = "Invalid invite token"),
        (status = 409, description = "Email already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterViaInviteRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    request.validate()?;

    let response = state
        .auth_service
        .register_via_invite(&request.token, &request.name, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange a refresh token for a new token pair
/// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = TokenPairResponse),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    let response = state.auth_service.refresh_tokens(&request.refresh_token).await?;
    Ok(Json(response))
}

/// Current user information (protected)
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<UserResponse>, AuthError> {
    let user = state.auth_service.get_current_user(principal.user_id).await?;
    Ok(Json(user))
}
