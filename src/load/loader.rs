//! Drives a [`LoadPhase`] field through a delayed load.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::load::intent::LoadIntent;
use crate::load::reducer::LoadReducer;
use crate::load::state::LoadPhase;
use crate::mvi::Reducer;
use crate::state::{ObservableState, StateError};

/// Errors that can occur while running a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    State(#[from] StateError),

    /// The work itself failed; the field now holds `LoadPhase::Failed`.
    #[error("Load failed: {reason}")]
    Failed { reason: String },
}

/// Writes load transitions into one field of a container.
///
/// There is no cancellation. Two loads running at once are neither queued
/// nor coalesced: each writes its own transitions and the last one wins.
#[derive(Debug, Clone)]
pub struct Loader {
    state: ObservableState,
    field: String,
    delay: Duration,
}

impl Loader {
    /// Create a loader for `field`, which must already exist on `state`.
    pub fn new(
        state: ObservableState,
        field: impl Into<String>,
        delay: Duration,
    ) -> Result<Self, StateError> {
        let field = field.into();
        // Fails fast on a bad field name or a field that is not a phase.
        state.get_as::<LoadPhase>(&field)?;
        Ok(Self {
            state,
            field,
            delay,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn phase(&self) -> Result<LoadPhase, StateError> {
        self.state.get_as(&self.field)
    }

    /// Reduce `intent` against the current phase and store the result.
    ///
    /// Every accepted intent writes (and so notifies), even when the phase
    /// is unchanged: each attempt reports its own start and its own result.
    /// A completion with no attempt started is dropped silently.
    pub fn apply(&self, intent: LoadIntent) -> Result<LoadPhase, StateError> {
        let current = self.phase()?;
        let next = LoadReducer::reduce(current.clone(), intent);

        if next == LoadPhase::NotLoaded {
            return Ok(next);
        }

        self.state.set_as(&self.field, &next)?;
        tracing::debug!(
            state = %self.state.id(),
            field = %self.field,
            from = ?current,
            to = ?next,
            "Load phase changed"
        );
        Ok(next)
    }

    /// Enter `Loading` now and hand back the remainder of the load.
    pub fn start(&self) -> Result<PendingLoad, StateError> {
        self.apply(LoadIntent::Start)?;
        Ok(PendingLoad {
            loader: self.clone(),
        })
    }

    /// Start, wait for the delay, then enter `Loaded`.
    pub async fn load(&self) -> Result<(), StateError> {
        self.start()?.finish().await
    }

    /// Like [`Loader::load`], but runs `work` after the delay and records
    /// its failure as `LoadPhase::Failed`.
    pub async fn load_with<F, E>(&self, work: F) -> Result<(), LoadError>
    where
        F: Future<Output = Result<(), E>>,
        E: Display,
    {
        let pending = self.start()?;
        pending.wait().await;

        match work.await {
            Ok(()) => {
                pending.loader.apply(LoadIntent::Complete)?;
                Ok(())
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(
                    state = %pending.loader.state.id(),
                    reason = %reason,
                    "Load failed"
                );
                pending.loader.apply(LoadIntent::Fail {
                    reason: reason.clone(),
                })?;
                Err(LoadError::Failed { reason })
            }
        }
    }
}

/// A load that has entered `Loading` but not finished.
#[derive(Debug)]
#[must_use = "the load stays in Loading until finish() is awaited"]
pub struct PendingLoad {
    loader: Loader,
}

impl PendingLoad {
    async fn wait(&self) {
        tokio::time::sleep(self.loader.delay).await;
    }

    pub async fn finish(self) -> Result<(), StateError> {
        self.wait().await;
        self.loader.apply(LoadIntent::Complete)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_state() -> ObservableState {
        ObservableState::builder()
            .field_as("phase", &LoadPhase::NotLoaded)
            .unwrap()
            .build()
    }

    #[test]
    fn test_new_rejects_unknown_field() {
        let state = phase_state();
        assert!(matches!(
            Loader::new(state, "missing", Duration::from_secs(1)),
            Err(StateError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_new_rejects_non_phase_field() {
        let state = ObservableState::builder().field("phase", 3).build();
        assert!(matches!(
            Loader::new(state, "phase", Duration::from_secs(1)),
            Err(StateError::Decode { .. })
        ));
    }

    #[test]
    fn test_start_is_synchronous() {
        let loader = Loader::new(phase_state(), "phase", Duration::from_secs(1)).unwrap();
        let _pending = loader.start().unwrap();
        assert_eq!(loader.phase().unwrap(), LoadPhase::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_reaches_loaded() {
        let loader = Loader::new(phase_state(), "phase", Duration::from_secs(1)).unwrap();
        loader.load().await.unwrap();
        assert_eq!(loader.phase().unwrap(), LoadPhase::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_with_failure() {
        let loader = Loader::new(phase_state(), "phase", Duration::from_millis(10)).unwrap();
        let result = loader
            .load_with(async { Err::<(), _>("backend unavailable") })
            .await;

        assert!(matches!(result, Err(LoadError::Failed { .. })));
        assert_eq!(
            loader.phase().unwrap(),
            LoadPhase::Failed {
                reason: "backend unavailable".into()
            }
        );

        // Retrying is just another load.
        loader.load().await.unwrap();
        assert_eq!(loader.phase().unwrap(), LoadPhase::Loaded);
    }
}
