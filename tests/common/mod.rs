//! Shared test utilities and fixtures.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stateflow::demos::Item;
use stateflow::load::LoadPhase;
use stateflow::state::{ObservableState, Subscription};

/// Subscribe a counter to `state`; returns the counter and its handle.
pub fn count_notifications(state: &ObservableState) -> (Arc<AtomicUsize>, Subscription) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let subscription = state.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (calls, subscription)
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Deterministic catalog: no random sentinel title.
pub fn fixture_items() -> Vec<Item> {
    vec![
        Item::new("Mouse", 40, "computermouse"),
        Item::new("Keyboard", 200, "keyboard"),
        Item::new("Dice", 4, "dice"),
        Item::new("SENTINEL", stateflow::demos::SENTINEL_PRICE, "infinity.circle"),
    ]
}

pub fn phase_container() -> ObservableState {
    ObservableState::builder()
        .label("test.phase")
        .field_as("phase", &LoadPhase::NotLoaded)
        .expect("phase encodes")
        .build()
}
