//! Asynchronous load state machine.
//!
//! `NotLoaded -> Loading -> Loaded`, with `Failed` as the per-attempt end
//! state when the work errors. The phase lives in a container field, so
//! every transition reaches the container's subscribers.

mod intent;
mod loader;
mod reducer;
mod state;

pub use intent::LoadIntent;
pub use loader::{LoadError, Loader, PendingLoad};
pub use reducer::LoadReducer;
pub use state::LoadPhase;
