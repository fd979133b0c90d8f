//! Scope lifecycle management.
//!
//! The renderer decides when a scope is activated and torn down; the
//! registry keeps each scope alive in between so owned-once slots survive
//! re-activation.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::scope::dependent::{Scope, ScopeKey};

/// Thread-safe map from scope key to live scope.
///
/// Cloning shares the same scopes.
#[derive(Clone, Default)]
pub struct ScopeRegistry {
    scopes: Arc<Mutex<BTreeMap<ScopeKey, Arc<Scope>>>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the scope at `key`, creating it on first activation.
    ///
    /// Re-activating a live key returns the same scope, so everything bound
    /// owned-once inside it persists.
    pub fn activate(&self, key: impl Into<ScopeKey>) -> Arc<Scope> {
        let key = key.into();
        let scope = {
            let mut scopes = self.scopes.lock();
            Arc::clone(
                scopes
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Scope::new(key.clone()))),
            )
        };

        let count = scope.mark_activated();
        if count == 1 {
            tracing::debug!(scope = %key, id = %scope.id(), "Scope activated");
        } else {
            tracing::trace!(scope = %key, activation = count, "Scope re-activated");
        }
        scope
    }

    /// The live scope at `key`, without activating it.
    pub fn get(&self, key: &ScopeKey) -> Option<Arc<Scope>> {
        self.scopes.lock().get(key).cloned()
    }

    pub fn is_active(&self, key: &ScopeKey) -> bool {
        self.scopes.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.scopes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.lock().is_empty()
    }

    /// Tear down `key` and every scope below it.
    ///
    /// Returns the number of scopes removed. Their owned containers are
    /// released once no other handle refers to them.
    pub fn teardown(&self, key: &ScopeKey) -> usize {
        let removed = {
            let mut scopes = self.scopes.lock();
            let before = scopes.len();
            scopes.retain(|k, _| k != key && !k.is_descendant_of(key));
            before - scopes.len()
        };

        if removed > 0 {
            tracing::debug!(scope = %key, removed, "Scope torn down");
        }
        removed
    }

    /// Tear down the direct children of `parent` whose keys are not in
    /// `keep`, together with their descendants.
    pub fn retain_children(&self, parent: &ScopeKey, keep: &[ScopeKey]) -> usize {
        let keep: HashSet<&ScopeKey> = keep.iter().collect();
        let stale: Vec<ScopeKey> = self
            .scopes
            .lock()
            .keys()
            .filter(|k| k.is_child_of(parent) && !keep.contains(k))
            .cloned()
            .collect();

        stale.iter().map(|key| self.teardown(key)).sum()
    }
}

impl std::fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("scopes", &self.scopes.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}
