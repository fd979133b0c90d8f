use std::sync::Weak;

use crate::state::container::StateInner;
use crate::state::StateId;

/// Per-container subscriber identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Handle returned by [`ObservableState::subscribe`](crate::state::ObservableState::subscribe).
///
/// Holds only a weak reference to the container, so keeping a handle around
/// never keeps a torn-down container alive. Dropping the handle does not
/// unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    state: Weak<StateInner>,
    state_id: StateId,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(state: Weak<StateInner>, state_id: StateId, id: SubscriberId) -> Self {
        Self {
            state,
            state_id,
            id,
        }
    }

    /// Remove the listener. Calling this again, or after the container was
    /// released, is a no-op.
    pub fn unsubscribe(&self) {
        let Some(inner) = self.state.upgrade() else {
            tracing::trace!(state = %self.state_id, "Container already released");
            return;
        };
        if inner.remove_subscriber(self.id) {
            tracing::trace!(state = %self.state_id, "Subscriber removed");
        }
    }

    /// Whether the listener is still registered on a live container.
    pub fn is_active(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|inner| inner.has_subscriber(self.id))
    }
}
