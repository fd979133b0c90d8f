mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{calls, count_notifications};
use stateflow::demos::CounterDemo;
use stateflow::scope::{ScopeKey, ScopeRegistry};
use stateflow::state::ObservableState;

fn view_model(subtitle: &str) -> ObservableState {
    ObservableState::builder()
        .field("count", 0)
        .field("subtitle", subtitle)
        .build()
}

#[test]
fn shared_dependents_never_diverge() {
    let registry = ScopeRegistry::new();
    let parent = view_model("A");

    let left = registry
        .activate("parent/left")
        .bind_shared("model", &parent)
        .into_state();
    let right = registry
        .activate("parent/right")
        .bind_shared("model", &parent)
        .into_state();
    let (left_calls, _l) = count_notifications(&left);
    let (right_calls, _r) = count_notifications(&right);

    for n in 1..=5 {
        // Dependents may write back into the shared container.
        let writer = if n % 2 == 0 { &left } else { &right };
        writer.set("count", n).unwrap();
        assert_eq!(
            left.get_as::<i64>("count").unwrap(),
            right.get_as::<i64>("count").unwrap()
        );
    }

    assert_eq!(left.id(), parent.id());
    assert_eq!(calls(&left_calls), 5);
    assert_eq!(calls(&right_calls), 5);
}

#[test]
fn shared_binding_follows_new_container() {
    let registry = ScopeRegistry::new();
    let first = view_model("A");
    first.set("count", 9).unwrap();
    let second = view_model("B");

    let scope = registry.activate("parent/child");
    scope.bind_shared("model", &first);
    let scope = registry.activate("parent/child");
    let binding = scope.bind_shared("model", &second);

    assert!(binding.rebound());
    assert_eq!(binding.state().get_as::<i64>("count").unwrap(), 0);
    assert_eq!(binding.state().get_as::<String>("subtitle").unwrap(), "B");
}

#[test]
fn owned_once_keeps_first_factory_output() {
    let registry = ScopeRegistry::new();
    let key = ScopeKey::new("parent/child");

    let first = registry
        .activate(key.clone())
        .bind_owned_once("model", || view_model("A"));
    let second = registry
        .activate(key.clone())
        .bind_owned_once("model", || view_model("B"));

    assert!(first.created());
    assert!(!second.created());
    assert_eq!(second.state().get_as::<String>("subtitle").unwrap(), "A");
}

#[test]
fn owned_once_constructs_exactly_once_over_many_activations() {
    let registry = ScopeRegistry::new();
    let key = ScopeKey::new("parent/child");
    let constructions = AtomicUsize::new(0);

    let mut last = None;
    for n in 0..10 {
        let subtitle = format!("seed {}", n);
        let binding = registry.activate(key.clone()).bind_owned_once("model", || {
            constructions.fetch_add(1, Ordering::SeqCst);
            view_model(&subtitle)
        });
        if n == 3 {
            binding.state().set("count", 3).unwrap();
        }
        last = Some(binding.into_state());
    }

    let last = last.unwrap();
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert_eq!(last.get_as::<String>("subtitle").unwrap(), "seed 0");
    // Mutations since the first activation are kept.
    assert_eq!(last.get_as::<i64>("count").unwrap(), 3);
    assert_eq!(registry.get(&key).unwrap().activations(), 10);
}

#[test]
fn owned_once_recreated_after_teardown() {
    let registry = ScopeRegistry::new();
    let key = ScopeKey::new("parent/child");

    registry
        .activate(key.clone())
        .bind_owned_once("model", || view_model("A"));
    registry.teardown(&key);
    let binding = registry
        .activate(key.clone())
        .bind_owned_once("model", || view_model("B"));

    assert!(binding.created());
    assert_eq!(binding.state().get_as::<String>("subtitle").unwrap(), "B");
}

#[test]
fn counter_shared_child_resets_on_parent_refresh() {
    let mut demo = CounterDemo::new(ScopeRegistry::new());
    demo.render().unwrap();

    demo.increment_observed().unwrap();
    let frame = demo.render().unwrap();
    // Child-only change: no parent pass, the shared child keeps its count.
    assert_eq!(frame.lines()[4], "Count: 1");

    let before = demo.observed().unwrap().id();
    demo.increment_parent().unwrap();
    let frame = demo.render().unwrap();

    assert_ne!(demo.observed().unwrap().id(), before);
    assert_eq!(frame.lines()[1], "Count: 1");
    assert_eq!(frame.lines()[4], "Count: 0");
}

#[test]
fn counter_owned_child_keeps_count_and_first_subtitle() {
    let mut demo = CounterDemo::new(ScopeRegistry::new());
    demo.render().unwrap();
    let owned = demo.owned().unwrap().id();

    demo.increment_owned().unwrap();
    demo.increment_owned().unwrap();
    demo.set_subtitle("Edited").unwrap();
    let frame = demo.render().unwrap();

    assert_eq!(demo.owned().unwrap().id(), owned);
    assert_eq!(frame.lines()[2], "Subtitle: Edited");
    // Shared child was rebuilt from the new subtitle.
    assert_eq!(frame.lines()[5], "Edited");
    assert_eq!(frame.lines()[7], "Count: 2");
    assert_eq!(frame.lines()[8], "Subtitle");
}

#[test]
fn counter_constructions_grow_only_with_parent_passes() {
    let mut demo = CounterDemo::new(ScopeRegistry::new());
    demo.render().unwrap();
    assert_eq!(demo.constructions(), 3);

    // No parent change: nothing rebuilt.
    demo.render().unwrap();
    assert_eq!(demo.constructions(), 3);

    demo.decrement_parent().unwrap();
    demo.render().unwrap();
    // Only the shared child is rebuilt; the owned factory is dropped.
    assert_eq!(demo.constructions(), 4);
}
