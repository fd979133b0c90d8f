//! Base trait for reducer-driven state.

/// Marker trait for state values produced by a [`Reducer`](super::Reducer).
///
/// States are plain values (Clone), comparable (PartialEq) so callers can
/// skip writes that change nothing, and have a well-defined starting point
/// (Default).
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
