use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::security::{Identity, PrincipalId};

// Errors returned by token decoding / verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("token expired")]
    Expired,
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("token subject does not match the resolved principal")]
    SubjectMismatch,
    #[error("token was issued before the principal's credentials changed")]
    Stale,
    #[error("verification key error: {0}")]
    Key(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed(e.to_string()),
            ErrorKind::InvalidKeyFormat => Self::Key(e.to_string()),
            _ => Self::Rejected(e.to_string()),
        }
    }
}

/// Access token claims.
///
/// NOTE:
/// - `aud` can be a string or an array; jsonwebtoken checks it when an audience is configured.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub aud: serde_json::Value,
    #[serde(default)]
    pub jti: Option<String>,
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }
}

/// Token verification boundary.
///
/// `extract_principal_id` only decodes: its result must never be treated as
/// proof of authenticity. `validate` checks signature and time claims, and
/// `verify` additionally binds the token to a resolved identity.
pub trait TokenValidator: Send + Sync {
    fn extract_principal_id(&self, token: &str) -> Result<PrincipalId, TokenError>;

    fn validate(&self, token: &str) -> Result<Claims, TokenError>;

    fn verify(&self, token: &str, identity: &Identity) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;

        if claims.sub != identity.id.as_str() {
            return Err(TokenError::SubjectMismatch);
        }

        if let Some(changed_at) = identity.credentials_changed_at {
            // Tokens without `iat` cannot prove they are newer than the change.
            // `iat` has whole-second precision, so compare at that granularity.
            match claims.iat {
                Some(iat) if iat >= changed_at.timestamp() => {}
                _ => return Err(TokenError::Stale),
            }
        }

        Ok(claims)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationSettings {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// jsonwebtoken-backed validator (EdDSA public key or HS256 shared secret).
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenValidator {
    pub fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        settings: &ValidationSettings,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = settings.leeway_seconds;
        validation.validate_nbf = true;

        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Ed25519 public key in SPKI PEM format.
    pub fn from_ed_pem(
        public_key_pem: &str,
        settings: &ValidationSettings,
    ) -> Result<Self, TokenError> {
        let key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| TokenError::Key(format!("invalid ed25519 public key pem: {}", e)))?;

        Ok(Self::new(key, Algorithm::EdDSA, settings))
    }

    /// Base64-encoded HMAC secret (HS256).
    pub fn from_base64_secret(
        secret: &str,
        settings: &ValidationSettings,
    ) -> Result<Self, TokenError> {
        let bytes = STANDARD
            .decode(secret.trim())
            .map_err(|e| TokenError::Key(format!("invalid base64 secret: {}", e)))?;
        if bytes.is_empty() {
            return Err(TokenError::Key("empty secret".into()));
        }

        Ok(Self::new(
            DecodingKey::from_secret(&bytes),
            Algorithm::HS256,
            settings,
        ))
    }
}

#[derive(Deserialize)]
struct SubjectOnly {
    #[serde(default)]
    sub: Option<String>,
}

impl TokenValidator for JwtTokenValidator {
    fn extract_principal_id(&self, token: &str) -> Result<PrincipalId, TokenError> {
        let mut segments = token.split('.');
        let (Some(_), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed("expected three segments".into()));
        };

        // Header must at least be a JOSE header; the signature is not checked here.
        jsonwebtoken::decode_header(token)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| TokenError::Malformed(format!("payload is not base64url: {}", e)))?;
        let claims: SubjectOnly = serde_json::from_slice(&payload)
            .map_err(|e| TokenError::Malformed(format!("payload is not a claims object: {}", e)))?;

        match claims.sub {
            Some(sub) if !sub.trim().is_empty() => Ok(PrincipalId::new(sub)),
            _ => Err(TokenError::Malformed("missing 'sub' claim".into())),
        }
    }

    fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
