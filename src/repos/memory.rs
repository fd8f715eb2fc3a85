//! In-memory identity store for development and tests.
use std::collections::HashMap;

use async_trait::async_trait;

use crate::repos::{IdentityStore, RepoError};
use crate::security::{Identity, PrincipalId};

/// Immutable after construction, so lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    identities: HashMap<PrincipalId, Identity>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.insert(identity.id.clone(), identity);
        self
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl FromIterator<Identity> for InMemoryIdentityStore {
    fn from_iter<I: IntoIterator<Item = Identity>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |store, identity| store.with_identity(identity))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, id: &PrincipalId) -> Result<Option<Identity>, RepoError> {
        Ok(self.identities.get(id).cloned())
    }
}
