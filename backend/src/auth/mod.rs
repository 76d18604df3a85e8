//! Authentication module for managing user accounts, tokens and access control.
//!
//! This module provides the public interface for user authentication-related functionalities
//! such as registration, login, token management and the extractors that guard handlers.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::AuthError;
pub use middleware::{CurrentUser, MaybeUser};
pub use routes::auth_router;
