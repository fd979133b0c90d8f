//! Model-View-Intent primitives for phase-like state.
//!
//! State machines that sit inside a container field (the load phase, for
//! one) are written as pure reducers and then applied to the container by
//! the component that owns it.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ container field ──→ subscribers
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
