//! Request-scoped holder of the authenticated identity.
//!
//! One `SecurityContext` is created per request and travels in the request
//! extensions. Clones share the same cell, so a handler that spawns work for
//! the same request sees the same identity. Nothing here is process-global.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Identity;

#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    slot: Arc<Mutex<Option<Identity>>>,
}

impl SecurityContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that is already authenticated (tests, internal calls).
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(identity))),
        }
    }

    pub fn get(&self) -> Option<Identity> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Stores `identity` only if the context is empty.
    ///
    /// Returns `true` when the identity was stored, `false` when an identity
    /// was already present (left untouched).
    pub fn set(&self, identity: Identity) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(identity);
        true
    }

    /// Ends the request's authentication. Called once the downstream chain returns.
    pub fn clear(&self) {
        self.lock().take();
    }

    fn lock(&self) -> MutexGuard<'_, Option<Identity>> {
        // The slot only holds plain data, a poisoned lock is still consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
