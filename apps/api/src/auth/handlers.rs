//! Axum route handlers for registration, login and the current-user lookup.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{PublicUser, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "username cannot be empty".to_string(),
        ));
    }
    if request.password.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "password cannot be empty".to_string(),
        ));
    }
    if !is_plausible_email(&request.email) {
        return Err(AppError::UnprocessableEntity(format!(
            "'{}' is not a valid email address",
            request.email
        )));
    }

    let password = request.password;
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let user = sqlx::query_as::<_, PublicUser>(
        r#"
        INSERT INTO users (username, email, password_hash, salt)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, email, created_at
        "#,
    )
    .bind(&username)
    .bind(&request.email)
    .bind(&hashed.hash)
    .bind(&hashed.salt)
    .fetch_one(&state.db)
    .await
    .map_err(duplicate_account_error)?;

    info!("Registered user {} ({})", user.id, user.username);

    let access_token = state.jwt.issue(user.id)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Incorrect email or password".to_string());

    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, salt, created_at FROM users WHERE email = ?",
    )
    .bind(&request.email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(invalid)?;

    let password = request.password;
    let (hash, salt) = (row.password_hash.clone(), row.salt.clone());
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash, &salt))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !matches {
        return Err(invalid());
    }

    let user = PublicUser::from(row);
    let access_token = state.jwt.issue(user.id)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// GET /api/auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "status": "success", "user": user }))
}

/// Maps a UNIQUE violation on `users` to a message naming the taken field.
fn duplicate_account_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &e {
        if db_error.is_unique_violation() {
            let message = db_error.message();
            let detail = if message.contains("users.username") {
                "Username is already taken"
            } else if message.contains("users.email") {
                "Email is already registered"
            } else {
                "User already exists"
            };
            return AppError::Validation(detail.to_string());
        }
    }
    AppError::Database(e)
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}
