//! Session auth: HS256 tokens issued at register/login and checked by the
//! `AuthUser` extractor on every protected route.

pub mod handlers;
pub mod password;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::user::PublicUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material derived once from `SECRET_KEY`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Session expired, please log in again".to_string())
            }
            _ => AppError::Unauthorized("Invalid authentication token".to_string()),
        })?;

        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid authentication token".to_string()))
    }
}

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".to_string()))?;

        // A bare token without the scheme is accepted too.
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        let user_id = state.jwt.verify(token)?;

        let user = find_public_user(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(AuthUser(user))
    }
}

pub async fn find_public_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<PublicUser>, sqlx::Error> {
    sqlx::query_as::<_, PublicUser>(
        "SELECT id, username, email, created_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify_roundtrips_user_id() {
        let keys = JwtKeys::new("secret", 7);
        let token = keys.issue(42).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::new("secret-a", 7).issue(1).unwrap();
        let err = JwtKeys::new("secret-b", 7).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("Invalid")));
    }

    #[test]
    fn test_expired_token_is_rejected_with_expiry_message() {
        // Well past the default 60s leeway.
        let keys = JwtKeys::new("secret", -1);
        let token = keys.issue(1).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let keys = JwtKeys::new("secret", 7);
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
