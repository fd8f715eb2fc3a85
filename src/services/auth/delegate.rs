//! Authentication failure -> HTTP response.
use async_trait::async_trait;
use axum::{
    http::request::Parts,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::auth::AuthError;

/// Turns a rejected authentication attempt into the response sent to the caller.
///
/// The middleware calls `handle` exactly once per rejection, with the
/// original request head, and sends its response without running the
/// downstream chain.
#[async_trait]
pub trait ErrorDelegate: Send + Sync {
    async fn handle(&self, request: &Parts, error: AuthError) -> Response;
}

/// Default delegate.
///
/// Every credential problem (malformed, expired, bad signature, unknown
/// principal) gets the same 401 body, so callers cannot tell them apart.
/// Server-side faults become 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorDelegate;

#[async_trait]
impl ErrorDelegate for JsonErrorDelegate {
    async fn handle(&self, _request: &Parts, error: AuthError) -> Response {
        if error.is_credential_error() {
            AppError::InvalidToken.into_response()
        } else {
            AppError::Internal.into_response()
        }
    }
}
