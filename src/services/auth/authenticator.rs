//! Per-request authentication pipeline.
//!
//! ```text
//! Start ── no bearer header ──────────────────────────────> NoToken (pass through)
//!   └─ token ─> decode principal ─ context already set ───> AlreadyAuthenticated (pass through)
//!                 └─ resolve identity ─> verify ─> set ────> Authenticated (pass through)
//!   any failure after the token was found ────────────────> Err(AuthError) (reject)
//! ```
//!
//! The context is written only after every step succeeded, so an abandoned
//! (cancelled) attempt leaves it untouched.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::security::{Identity, SecurityContext};
use crate::services::auth::{
    AuthError, ErrorDelegate, JsonErrorDelegate, PrincipalResolver, TokenValidator, bearer_token,
};

/// Successful outcomes of one attempt. Rejections are `Err(AuthError)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// No `Authorization: Bearer` header; the request continues anonymously.
    NoToken,
    /// The context already held an identity; nothing was re-checked.
    AlreadyAuthenticated,
    /// The token was verified and the identity stored in the context.
    Authenticated(Identity),
}

pub type AuthResult = Result<Authentication, AuthError>;

#[derive(Clone)]
pub struct Authenticator {
    validator: Arc<dyn TokenValidator>,
    resolver: Arc<dyn PrincipalResolver>,
    error_delegate: Arc<dyn ErrorDelegate>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(validator: Arc<dyn TokenValidator>, resolver: Arc<dyn PrincipalResolver>) -> Self {
        Self {
            validator,
            resolver,
            error_delegate: Arc::new(JsonErrorDelegate),
        }
    }

    pub fn with_error_delegate(mut self, error_delegate: Arc<dyn ErrorDelegate>) -> Self {
        self.error_delegate = error_delegate;
        self
    }

    pub fn error_delegate(&self) -> &dyn ErrorDelegate {
        self.error_delegate.as_ref()
    }

    /// Runs the pipeline for one request.
    ///
    /// Anonymous requests are fine; a request that presents a bearer token
    /// must present a valid one.
    pub async fn authenticate(&self, headers: &HeaderMap, ctx: &SecurityContext) -> AuthResult {
        let Some(token) = bearer_token(headers) else {
            return Ok(Authentication::NoToken);
        };

        // Decode only. Not proof of anything until `verify` below.
        let principal = self.validator.extract_principal_id(token)?;

        if ctx.is_authenticated() {
            return Ok(Authentication::AlreadyAuthenticated);
        }

        let identity = self.resolver.resolve(&principal).await?;
        self.validator.verify(token, &identity)?;

        if !ctx.set(identity.clone()) {
            // Another task of the same request got there first.
            return Ok(Authentication::AlreadyAuthenticated);
        }

        Ok(Authentication::Authenticated(identity))
    }
}
