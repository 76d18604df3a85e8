//! Data structures for authentication-related requests and responses.
//!
//! This module defines the registration, login and password change payloads
//! and the token response returned on login.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
