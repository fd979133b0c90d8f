use serde::{Deserialize, Serialize};

use crate::mvi::UiState;

/// Phase of an asynchronous load, stored in a container field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    /// Terminal for one attempt; a new load starts over.
    Failed { reason: String },
}

impl UiState for LoadPhase {}

impl LoadPhase {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
