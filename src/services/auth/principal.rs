//! Principal lookup boundary: identifier -> full identity record.
use async_trait::async_trait;
use thiserror::Error;

use crate::repos::IdentityStore;
use crate::security::{Identity, PrincipalId};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no identity for principal {0}")]
    NotFound(PrincipalId),
    #[error("identity store failure: {0}")]
    Backend(String),
}

/// Resolves a decoded principal identifier to an `Identity`.
///
/// Implementations may suspend on I/O. Caching and consistency are the
/// store's business.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, id: &PrincipalId) -> Result<Identity, ResolveError>;
}

// Every identity store resolves principals; `None` becomes `NotFound`.
#[async_trait]
impl<S> PrincipalResolver for S
where
    S: IdentityStore + ?Sized,
{
    async fn resolve(&self, id: &PrincipalId) -> Result<Identity, ResolveError> {
        match self.lookup(id).await {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Err(ResolveError::NotFound(id.clone())),
            Err(e) => {
                tracing::error!(error = ?e, store = self.backend_name(), "identity lookup failed");
                Err(ResolveError::Backend(e.to_string()))
            }
        }
    }
}
