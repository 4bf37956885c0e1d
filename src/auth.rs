//! Authentication context threaded into the fetch collaborator.
//!
//! Holds the bearer token issued at sign-in. The pipeline never looks inside
//! the token; it only forwards it as an `Authorization` header.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("not signed in")]
    SignedOut,

    #[error("empty bearer token")]
    EmptyToken,
}

/// Credential state: set on login, cleared on logout.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    /// A signed-out context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signed-in context.
    pub fn with_token(token: impl Into<String>) -> Result<Self, AuthError> {
        let mut ctx = Self::new();
        ctx.login(token)?;
        Ok(ctx)
    }

    /// Store the token issued at sign-in.
    pub fn login(&mut self, token: impl Into<String>) -> Result<(), AuthError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.token = Some(token);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> Result<String, AuthError> {
        self.token
            .as_deref()
            .map(|token| format!("Bearer {}", token))
            .ok_or(AuthError::SignedOut)
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the token itself
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
