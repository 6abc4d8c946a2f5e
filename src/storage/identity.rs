//! Session-token identity provider.
//!
//! Sign-in itself happens elsewhere: this provider only resolves a session
//! token to the user it was issued for. Tokens are read from an
//! `Authorization: Bearer` header, falling back to the session cookie.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::config::SESSION_COOKIE_NAME;
use crate::error_handling::DatabaseError;
use crate::models::Identity;

/// Resolves the caller of a request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` means anonymous, which is not an error.
    async fn current_identity(&self, headers: &HeaderMap)
        -> Result<Option<Identity>, DatabaseError>;
}

/// Extracts the session token from request headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `IdentityProvider` backed by the `users` and `sessions` tables.
#[derive(Debug, Clone)]
pub struct SessionIdentityProvider {
    pool: SqlitePool,
}

impl SessionIdentityProvider {
    pub fn new(pool: SqlitePool) -> Self {
        SessionIdentityProvider { pool }
    }

    /// Creates a user and returns it. Fails if the email is already taken.
    pub async fn register_user(&self, email: &str) -> Result<Identity, DatabaseError> {
        let email = email.trim().to_lowercase();
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO users (id, email, created_at_ms) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&email)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?;
        log::info!("Registered user {email}");
        Ok(Identity { id, email })
    }

    /// Mints a session token for `user_id` valid for `ttl`.
    pub async fn issue_session(
        &self,
        user_id: &str,
        ttl: Duration,
    ) -> Result<String, DatabaseError> {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now().timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at_ms, expires_at_ms)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(user_id)
        .bind(now)
        .bind(now.saturating_add(ttl_ms))
        .execute(&self.pool)
        .await?;
        Ok(token)
    }

    /// Returns `true` if the token existed.
    pub async fn revoke_session(&self, token: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolves an unexpired session token to its user.
    pub async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, DatabaseError> {
        let row = sqlx::query(
            "SELECT u.id, u.email
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ? AND s.expires_at_ms > ?",
        )
        .bind(token)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<Identity, DatabaseError> {
            Ok(Identity {
                id: row.try_get("id")?,
                email: row.try_get("email")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn current_identity(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Identity>, DatabaseError> {
        match session_token(headers) {
            Some(token) => self.identity_for_token(&token).await,
            None => Ok(None),
        }
    }
}
