//! Dependent scopes and the binders that hand them containers.
//!
//! Two ways for a dependent to get at a container:
//!
//! - [`Scope::bind_shared`]: whatever the ancestor passes on this
//!   activation, by identity. All parties see all mutations.
//! - [`Scope::bind_owned_once`]: created by the scope itself on first
//!   activation and never replaced. A parent that keeps passing freshly
//!   seeded factories is silently ignored after the first one.

mod binding;
mod dependent;
mod registry;

pub use binding::{OwnedBinding, SharedBinding};
pub use dependent::{Scope, ScopeId, ScopeKey};
pub use registry::ScopeRegistry;
