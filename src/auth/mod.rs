// Authentication module
// JWT-based authentication with invite-only registration and role gates

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use handlers::{invite_handler, login_handler, me_handler, refresh_handler, register_handler};
pub use middleware::{authenticate, Principal, RequireRole};
pub use models::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterViaInviteRequest, Role, TokenPairResponse,
    User, UserResponse, UserStatus,
};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
