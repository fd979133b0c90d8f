use crate::mvi::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIntent {
    /// Caller requested a load (first activation, refresh, retry).
    Start,
    /// The delay elapsed and the work succeeded.
    Complete,
    Fail { reason: String },
}

impl Intent for LoadIntent {}
