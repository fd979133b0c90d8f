//! Forwarding of nested container notifications to an outer container.
//!
//! An outer container that holds another container as a plain field does not
//! hear about mutations inside it: the outer field still points at the same
//! container, so nothing about the outer record changed. [`bridge`] closes
//! that gap by re-sending the inner container's notifications as the outer
//! container's own.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::error::StateError;
use crate::state::{ObservableState, Subscription};

/// Forward every notification of `inner` to the subscribers of `outer`.
///
/// `inner_field` must be a field of `outer`; it names the slot the inner
/// container lives in and is used for diagnostics. Outer fields are never
/// written. The registration holds only a weak reference to `outer`, so an
/// outer container that owns `inner` can still be released; the first inner
/// notification after that removes the registration.
///
/// Revoke with [`Subscription::unsubscribe`] on the returned handle.
pub fn bridge(
    outer: &ObservableState,
    inner_field: &str,
    inner: &ObservableState,
) -> Result<Subscription, StateError> {
    if !outer.has_field(inner_field) {
        return Err(StateError::UnknownField {
            state: outer.id(),
            field: inner_field.to_string(),
        });
    }

    let target = outer.downgrade();
    let field = inner_field.to_string();
    let source = inner.id();
    let own: Arc<Mutex<Option<Subscription>>> = Arc::default();
    let registration = Arc::clone(&own);
    let subscription = inner.subscribe(move || match target.upgrade() {
        Some(outer) => {
            tracing::trace!(outer = %outer.id(), inner = %source, field = %field, "Forwarding change");
            outer.notify();
        }
        None => {
            if let Some(stale) = registration.lock().take() {
                stale.unsubscribe();
                tracing::debug!(inner = %source, field = %field, "Bridge target released, removed");
            }
        }
    });
    *own.lock() = Some(subscription.clone());

    tracing::debug!(
        outer = %outer.id(),
        inner = %inner.id(),
        field = inner_field,
        "Bridge installed"
    );

    Ok(subscription)
}
