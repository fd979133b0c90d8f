//! Dependent scopes and the slots they bind containers into.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::scope::binding::{OwnedBinding, SharedBinding};
use crate::state::{ObservableState, StateId};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one scope lifetime. A torn-down and re-activated key gets a
/// new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    fn next() -> Self {
        Self(NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Stable, slash-separated path naming a scope position, e.g.
/// `catalog/cell/keyboard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(String);

impl ScopeKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Key of a child scope under this one.
    ///
    /// `segment` always names exactly one level: a `/` inside it is
    /// escaped (as is `%`), so `child("a/b")` is a sibling of `child("a")`.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let segment = segment.to_string();
        let mut key = String::with_capacity(self.0.len() + segment.len() + 1);
        key.push_str(&self.0);
        key.push('/');
        for ch in segment.chars() {
            match ch {
                '%' => key.push_str("%25"),
                '/' => key.push_str("%2F"),
                other => key.push(other),
            }
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &ScopeKey) -> bool {
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// True if `self` is a direct child of `parent`.
    pub fn is_child_of(&self, parent: &ScopeKey) -> bool {
        self.0
            .strip_prefix(parent.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Lifecycle boundary of a dependent view.
///
/// Owns the containers bound with [`Scope::bind_owned_once`]; they live as
/// long as the scope does.
pub struct Scope {
    id: ScopeId,
    key: ScopeKey,
    activations: AtomicU64,
    owned: Mutex<HashMap<String, ObservableState>>,
    shared: Mutex<HashMap<String, StateId>>,
}

impl Scope {
    pub(crate) fn new(key: ScopeKey) -> Self {
        Self {
            id: ScopeId::next(),
            key,
            activations: AtomicU64::new(0),
            owned: Mutex::new(HashMap::new()),
            shared: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// How many times this scope has been activated.
    pub fn activations(&self) -> u64 {
        self.activations.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_activated(&self) -> u64 {
        self.activations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Bind the container the ancestor passes on this activation.
    pub fn bind_shared(&self, slot: &str, state: &ObservableState) -> SharedBinding {
        let previous = self.shared.lock().insert(slot.to_string(), state.id());
        let rebound = previous.is_some_and(|id| id != state.id());
        if rebound {
            tracing::debug!(
                scope = %self.key,
                slot,
                state = %state.id(),
                "Shared slot rebound to a new container"
            );
        }
        SharedBinding::new(state.clone(), rebound)
    }

    /// Return the container stored in `slot`, creating it with `factory` on
    /// the first call only.
    ///
    /// Persistence is keyed by this scope and `slot` alone. A later call
    /// drops its factory uncalled, whatever values the factory captured.
    /// The factory runs under the slot lock and must not bind on this scope.
    pub fn bind_owned_once<F>(&self, slot: &str, factory: F) -> OwnedBinding
    where
        F: FnOnce() -> ObservableState,
    {
        let mut owned = self.owned.lock();
        if let Some(existing) = owned.get(slot) {
            tracing::trace!(
                scope = %self.key,
                slot,
                state = %existing.id(),
                "Factory reinvocation suppressed"
            );
            return OwnedBinding::new(existing.clone(), false);
        }

        let state = factory();
        tracing::debug!(scope = %self.key, slot, state = %state.id(), "Owned slot created");
        owned.insert(slot.to_string(), state.clone());
        OwnedBinding::new(state, true)
    }

    /// The container in an owned slot, if it was ever bound.
    pub fn owned(&self, slot: &str) -> Option<ObservableState> {
        self.owned.lock().get(slot).cloned()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("activations", &self.activations())
            .field("owned_slots", &self.owned.lock().len())
            .finish()
    }
}
