//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents are requests to change state: a caller asking for a reload, a
/// timer firing, a fetch failing. Reducers turn them into new states.
pub trait Intent: Send + 'static {}
