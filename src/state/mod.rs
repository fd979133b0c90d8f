//! Observable state containers.
//!
//! Provides the container itself, its subscription handles, and the bridge
//! that forwards notifications from a nested container to its owner.

mod bridge;
mod container;
mod error;
mod subscription;
mod value;

pub use bridge::bridge;
pub use container::{ObservableState, StateBuilder, StateId, WeakState};
pub use error::StateError;
pub use subscription::{SubscriberId, Subscription};
pub use value::FieldValue;
