use crate::load::intent::LoadIntent;
use crate::load::state::LoadPhase;
use crate::mvi::Reducer;

pub struct LoadReducer;

impl Reducer for LoadReducer {
    type State = LoadPhase;
    type Intent = LoadIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // Restarting is allowed from every phase, Loading included.
            LoadIntent::Start => LoadPhase::Loading,
            // Completions belong to an attempt, so they only need some
            // attempt to have started. Each one lands, the latest wins.
            LoadIntent::Complete => match state {
                LoadPhase::NotLoaded => LoadPhase::NotLoaded,
                _ => LoadPhase::Loaded,
            },
            LoadIntent::Fail { reason } => match state {
                LoadPhase::NotLoaded => LoadPhase::NotLoaded,
                _ => LoadPhase::Failed { reason },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_enters_loading_from_any_phase() {
        for phase in [
            LoadPhase::NotLoaded,
            LoadPhase::Loading,
            LoadPhase::Loaded,
            LoadPhase::Failed {
                reason: "offline".into(),
            },
        ] {
            assert_eq!(
                LoadReducer::reduce(phase, LoadIntent::Start),
                LoadPhase::Loading
            );
        }
    }

    #[test]
    fn complete_needs_a_started_attempt() {
        assert_eq!(
            LoadReducer::reduce(LoadPhase::Loading, LoadIntent::Complete),
            LoadPhase::Loaded
        );
        assert_eq!(
            LoadReducer::reduce(LoadPhase::NotLoaded, LoadIntent::Complete),
            LoadPhase::NotLoaded
        );
    }

    #[test]
    fn fail_keeps_reason() {
        let state = LoadReducer::reduce(
            LoadPhase::Loading,
            LoadIntent::Fail {
                reason: "timeout".into(),
            },
        );
        assert_eq!(
            state,
            LoadPhase::Failed {
                reason: "timeout".into()
            }
        );
    }

    #[test]
    fn later_completion_overrides_earlier_failure() {
        let failed = LoadPhase::Failed {
            reason: "offline".into(),
        };
        assert_eq!(
            LoadReducer::reduce(failed, LoadIntent::Complete),
            LoadPhase::Loaded
        );
    }

    #[test]
    fn later_failure_overrides_earlier_completion() {
        let state = LoadReducer::reduce(
            LoadPhase::Loaded,
            LoadIntent::Fail {
                reason: "late".into(),
            },
        );
        assert_eq!(
            state,
            LoadPhase::Failed {
                reason: "late".into()
            }
        );
    }
}
