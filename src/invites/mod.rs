// Invite lifecycle module
// Single-use, time-bounded registration invites issued by admins

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::InviteError;
pub use models::{CreateInviteRequest, Invite, InviteResponse};
pub use repository::InviteRepository;
pub use service::InviteService;
