//! Factory: build `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, TokenKey};
use crate::error::AppError;
use crate::services::auth::{
    Authenticator, JwtTokenValidator, PrincipalResolver, ValidationSettings,
};

pub fn build_authenticator(
    config: &Config,
    resolver: Arc<dyn PrincipalResolver>,
) -> Result<Arc<Authenticator>, AppError> {
    let settings = ValidationSettings {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    let validator = match &config.token_key {
        TokenKey::Ed25519PublicPem(pem) => JwtTokenValidator::from_ed_pem(pem, &settings),
        TokenKey::HmacSecret(secret) => JwtTokenValidator::from_base64_secret(secret, &settings),
    }
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build access token validator");
        AppError::Internal
    })?;

    Ok(Arc::new(Authenticator::new(Arc::new(validator), resolver)))
}
