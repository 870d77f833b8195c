//! Bearer-token authentication boundary.
//!
//! Token issuing and verification live upstream; the core only consumes a
//! verified `(principal, role)` pair. The `Authenticator` is injected into
//! `AppState`, never read from process-wide state, and the extractor turns
//! the `Authorization` header into an `AuthContext` or a 401.

use crate::api::AppState;
use crate::config::ApiToken;
use crate::domain::{Role, VendorId};
use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::collections::HashMap;

/// Verified caller identity.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: VendorId,
    pub role: Role,
}

impl AuthContext {
    /// Reject callers holding the wrong role.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            return Err(AppError::Auth(format!("requires {} role", role)));
        }
        Ok(())
    }
}

/// Resolves a bearer token to a caller identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<AuthContext>;
}

/// Authenticator over the token table from configuration.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, AuthContext>,
}

impl StaticTokenAuthenticator {
    pub fn from_tokens(tokens: &[ApiToken]) -> Self {
        let tokens = tokens
            .iter()
            .map(|t| {
                (
                    t.token.clone(),
                    AuthContext {
                        principal: VendorId::new(t.principal.clone()),
                        role: t.role,
                    },
                )
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn resolve(&self, token: &str) -> Option<AuthContext> {
        self.tokens.get(token).cloned()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Auth("missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Auth("malformed authorization header".to_string()))?;

        state
            .authenticator
            .resolve(token)
            .await
            .ok_or_else(|| AppError::Auth("invalid token".to_string()))
    }
}
