//! Failures of one authentication attempt.
//!
//! Every variant ends the request at the middleware boundary: the error
//! delegate builds the response and the downstream chain never runs.
//! Absence of a token is not an error (see `Authentication::NoToken`).

use thiserror::Error;

use crate::security::PrincipalId;
use crate::services::auth::principal::ResolveError;
use crate::services::auth::token::TokenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed bearer token: {0}")]
    MalformedToken(String),
    #[error("expired or invalid token: {0}")]
    ExpiredOrInvalidSignature(String),
    #[error("unknown principal: {0}")]
    UnknownPrincipal(PrincipalId),
    #[error("unexpected authentication fault: {0}")]
    UnexpectedFault(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MalformedToken,
    ExpiredOrInvalidSignature,
    UnknownPrincipal,
    UnexpectedFault,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::ExpiredOrInvalidSignature => "expired_or_invalid_signature",
            Self::UnknownPrincipal => "unknown_principal",
            Self::UnexpectedFault => "unexpected_fault",
        }
    }
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MalformedToken(_) => AuthErrorKind::MalformedToken,
            Self::ExpiredOrInvalidSignature(_) => AuthErrorKind::ExpiredOrInvalidSignature,
            Self::UnknownPrincipal(_) => AuthErrorKind::UnknownPrincipal,
            Self::UnexpectedFault(_) => AuthErrorKind::UnexpectedFault,
        }
    }

    /// True for problems with the presented credential (as opposed to server faults).
    pub fn is_credential_error(&self) -> bool {
        !matches!(self, Self::UnexpectedFault(_))
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed(reason) => Self::MalformedToken(reason),
            TokenError::Key(reason) => Self::UnexpectedFault(reason),
            other => Self::ExpiredOrInvalidSignature(other.to_string()),
        }
    }
}

impl From<ResolveError> for AuthError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(id) => Self::UnknownPrincipal(id),
            ResolveError::Backend(reason) => Self::UnexpectedFault(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_taxonomy() {
        assert_eq!(
            AuthError::from(TokenError::Malformed("x".into())).kind(),
            AuthErrorKind::MalformedToken
        );
        assert_eq!(
            AuthError::from(TokenError::Expired).kind(),
            AuthErrorKind::ExpiredOrInvalidSignature
        );
        assert_eq!(
            AuthError::from(TokenError::InvalidSignature).kind(),
            AuthErrorKind::ExpiredOrInvalidSignature
        );
        assert_eq!(
            AuthError::from(TokenError::SubjectMismatch).kind(),
            AuthErrorKind::ExpiredOrInvalidSignature
        );
        assert_eq!(
            AuthError::from(TokenError::Key("bad pem".into())).kind(),
            AuthErrorKind::UnexpectedFault
        );
    }

    #[test]
    fn resolve_errors_map_to_taxonomy() {
        let err = AuthError::from(ResolveError::NotFound("42".into()));
        assert_eq!(err.kind(), AuthErrorKind::UnknownPrincipal);
        assert!(err.is_credential_error());

        let err = AuthError::from(ResolveError::Backend("db down".into()));
        assert_eq!(err.kind(), AuthErrorKind::UnexpectedFault);
        assert!(!err.is_credential_error());
    }
}
