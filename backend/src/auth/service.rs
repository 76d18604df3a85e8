//! Core business logic for the authentication system.
//!
//! This service handles user creation, argon2 password hashing and opaque
//! token issuance and validation. It orchestrates interactions between the
//! handlers and the database.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::SqlitePool;
use tracing::info;

use super::{errors::AuthError, models::RegisterRequest};
use crate::database::{
    is_unique_violation,
    models::{NewUser, UserRow},
    queries,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_NAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 40 lowercase hex characters from 20 random bytes.
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 20]>())
}

fn invalid(message: impl Into<String>) -> AuthError {
    AuthError::InvalidRegistration(message.into())
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(invalid(format!(
            "Password must contain at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(())
}

fn check_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    let email = request.email.trim();
    let valid_email = email.len() <= MAX_EMAIL_LENGTH
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(invalid("Enter a valid email address."));
    }

    let username = request.username.trim();
    let valid_username = !username.is_empty()
        && username.chars().count() <= MAX_NAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'));
    if !valid_username {
        return Err(invalid(
            "Username may contain only letters, digits and @/./+/-/_ characters.",
        ));
    }

    for (field, value) in [("First name", &request.first_name), ("Last name", &request.last_name)] {
        let length = value.trim().chars().count();
        if length == 0 || length > MAX_NAME_LENGTH {
            return Err(invalid(format!(
                "{field} must be between 1 and {MAX_NAME_LENGTH} characters."
            )));
        }
    }

    check_password(&request.password)
}

pub async fn register(pool: &SqlitePool, request: &RegisterRequest) -> Result<UserRow, AuthError> {
    check_registration(request)?;

    let email = request.email.trim();
    let username = request.username.trim();
    if queries::find_user_by_email(pool, email).await?.is_some() {
        return Err(invalid("A user with that email already exists."));
    }
    if queries::user_exists_with_username(pool, username).await? {
        return Err(invalid("A user with that username already exists."));
    }

    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser {
        email,
        username,
        first_name: request.first_name.trim(),
        last_name: request.last_name.trim(),
        password_hash: &password_hash,
    };

    match queries::insert_user(pool, &new_user).await {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Ok(user)
        }
        Err(err) if is_unique_violation(&err) => Err(invalid(
            "A user with that email or username already exists.",
        )),
        Err(err) => Err(err.into()),
    }
}

/// Returns the user's token, creating one on first login.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<String, AuthError> {
    let user = queries::find_user_by_email(pool, email.trim())
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or(AuthError::InvalidCredentials)?;

    if let Some(token) = queries::find_token_for_user(pool, user.id).await? {
        return Ok(token);
    }

    let token = generate_token();
    match queries::insert_token(pool, &token, user.id).await {
        Ok(()) => {
            info!(user_id = user.id, "token issued");
            Ok(token)
        }
        // A concurrent login for the same user won the insert.
        Err(err) if is_unique_violation(&err) => queries::find_token_for_user(pool, user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials),
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(pool: &SqlitePool, user_id: i64) -> Result<(), AuthError> {
    queries::delete_tokens_for_user(pool, user_id).await?;
    info!(user_id, "token revoked");
    Ok(())
}

pub async fn authenticate(pool: &SqlitePool, token: &str) -> Result<UserRow, AuthError> {
    queries::find_user_by_token(pool, token)
        .await?
        .ok_or(AuthError::InvalidToken)
}

pub async fn set_password(
    pool: &SqlitePool,
    user: &UserRow,
    current_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    if !verify_password(current_password, &user.password_hash) {
        return Err(AuthError::WrongPassword);
    }
    check_password(new_password)?;

    let hash = hash_password(new_password)?;
    queries::update_password_hash(pool, user.id, &hash).await?;
    info!(user_id = user.id, "password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "cook@example.com".to_string(),
            username: "cook.42".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn hashes_verify() {
        let hash = hash_password("correct-horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse", &hash));
        assert!(!verify_password("wrong-horse", &hash));
        assert!(!verify_password("correct-horse", "not a hash"));
    }

    #[test]
    fn tokens_are_forty_hex_chars() {
        let token = generate_token();

        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn validates_registration_fields() {
        assert!(check_registration(&request()).is_ok());

        let mut bad = request();
        bad.email = "not-an-email".to_string();
        assert!(check_registration(&bad).is_err());

        let mut bad = request();
        bad.username = "has space".to_string();
        assert!(check_registration(&bad).is_err());

        let mut bad = request();
        bad.first_name = " ".to_string();
        assert!(check_registration(&bad).is_err());

        let mut bad = request();
        bad.password = "short".to_string();
        assert!(matches!(
            check_registration(&bad),
            Err(AuthError::InvalidRegistration(_))
        ));
    }
}
