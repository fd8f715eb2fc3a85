/*
 * Responsibility
 * - identity store (PrincipalResolver の実体)
 * - Postgres 実装と開発/テスト用の in-memory 実装
 */
use async_trait::async_trait;

use crate::security::{Identity, PrincipalId};

pub mod error;
pub mod identity_repo;
pub mod memory;

pub use error::RepoError;
pub use identity_repo::PgIdentityStore;
pub use memory::InMemoryIdentityStore;

/// Read-only identity lookup.
///
/// Implementations must be safe to share across requests; their own
/// synchronization is the only cross-request state the auth core touches.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    // Returns the store name (for logging).
    fn backend_name(&self) -> &'static str;

    // `Ok(None)` when no principal matches.
    async fn lookup(&self, id: &PrincipalId) -> Result<Option<Identity>, RepoError>;
}
