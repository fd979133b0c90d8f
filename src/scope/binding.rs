use crate::state::ObservableState;

/// A dependent's view of a container its ancestor passed in.
///
/// Always the container from the current activation. When `rebound()` is
/// true the ancestor switched containers and the dependent must render
/// against the new one.
#[derive(Debug, Clone)]
pub struct SharedBinding {
    state: ObservableState,
    rebound: bool,
}

impl SharedBinding {
    pub(crate) fn new(state: ObservableState, rebound: bool) -> Self {
        Self { state, rebound }
    }

    pub fn state(&self) -> &ObservableState {
        &self.state
    }

    pub fn into_state(self) -> ObservableState {
        self.state
    }

    /// True when this activation bound a different container than the last.
    pub fn rebound(&self) -> bool {
        self.rebound
    }
}

/// A container the dependent scope created for itself on first activation.
#[derive(Debug, Clone)]
pub struct OwnedBinding {
    state: ObservableState,
    created: bool,
}

impl OwnedBinding {
    pub(crate) fn new(state: ObservableState, created: bool) -> Self {
        Self { state, created }
    }

    pub fn state(&self) -> &ObservableState {
        &self.state
    }

    pub fn into_state(self) -> ObservableState {
        self.state
    }

    /// True only for the activation that ran the factory.
    pub fn created(&self) -> bool {
        self.created
    }
}
