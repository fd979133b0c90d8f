//! Parent-owned counter shared with two kinds of child.
//!
//! The parent owns `{count, subtitle}`. On every parent render pass:
//!
//! - the "observed" child is handed a container built right there in the
//!   pass, so each parent refresh replaces it and its count starts over;
//! - the "owned" child is handed a factory seeded from the parent subtitle,
//!   which only ever runs once, so later subtitle edits never reach it.
//!
//! Child-only changes re-render just that child; the parent pass (and with
//! it the rebuild of the observed child) only happens when the parent
//! container notifies.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::demos::{DemoError, Frame};
use crate::scope::{ScopeKey, ScopeRegistry};
use crate::state::{ObservableState, StateError, Subscription};

pub const DEFAULT_SUBTITLE: &str = "Subtitle";

const VIEW_MODEL_SLOT: &str = "view_model";

fn construct_view_model(constructions: &AtomicUsize, subtitle: &str) -> ObservableState {
    let n = constructions.fetch_add(1, Ordering::SeqCst) + 1;
    let state = ObservableState::builder()
        .label("counter.view_model")
        .field("count", 0)
        .field("subtitle", subtitle)
        .build();
    tracing::debug!(state = %state.id(), construction = n, subtitle, "Counter view model constructed");
    state
}

fn increment(state: &ObservableState, delta: i64) -> Result<i64, StateError> {
    state.update_as("count", |count: &mut i64| {
        *count += delta;
        *count
    })
}

pub struct CounterDemo {
    registry: ScopeRegistry,
    root: ScopeKey,
    constructions: Arc<AtomicUsize>,
    parent: ObservableState,
    parent_dirty: Arc<AtomicBool>,
    parent_subscription: Subscription,
    observed: Option<ObservableState>,
    owned: Option<ObservableState>,
}

impl CounterDemo {
    pub fn new(registry: ScopeRegistry) -> Self {
        let root = ScopeKey::new("counter");
        let constructions = Arc::new(AtomicUsize::new(0));

        let scope = registry.activate(root.clone());
        let parent = scope
            .bind_owned_once(VIEW_MODEL_SLOT, || {
                construct_view_model(&constructions, DEFAULT_SUBTITLE)
            })
            .into_state();

        let parent_dirty = Arc::new(AtomicBool::new(true));
        let dirty = Arc::clone(&parent_dirty);
        let parent_subscription = parent.subscribe(move || dirty.store(true, Ordering::SeqCst));

        Self {
            registry,
            root,
            constructions,
            parent,
            parent_dirty,
            parent_subscription,
            observed: None,
            owned: None,
        }
    }

    /// Number of view models constructed so far, parent included.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    pub fn parent(&self) -> &ObservableState {
        &self.parent
    }

    pub fn observed(&self) -> Option<&ObservableState> {
        self.observed.as_ref()
    }

    pub fn owned(&self) -> Option<&ObservableState> {
        self.owned.as_ref()
    }

    /// Run one render pass.
    ///
    /// The parent body is re-evaluated only if the parent container changed
    /// since the last pass.
    pub fn render(&mut self) -> Result<Frame, DemoError> {
        let parent_pass = self.parent_dirty.swap(false, Ordering::SeqCst);
        let count: i64 = self.parent.get_as("count")?;
        let subtitle: String = self.parent.get_as("subtitle")?;

        if parent_pass {
            self.registry.activate(self.root.clone());

            let observed_scope = self.registry.activate(self.root.child("observed"));
            // Constructed eagerly inside the pass: a new container every time.
            let fresh = construct_view_model(&self.constructions, &subtitle);
            let binding = observed_scope.bind_shared(VIEW_MODEL_SLOT, &fresh);
            self.observed = Some(binding.into_state());

            let owned_scope = self.registry.activate(self.root.child("owned"));
            let constructions = Arc::clone(&self.constructions);
            let seed = subtitle.clone();
            let binding = owned_scope.bind_owned_once(VIEW_MODEL_SLOT, move || {
                construct_view_model(&constructions, &seed)
            });
            self.owned = Some(binding.into_state());
        }

        let mut frame = Frame::new();
        frame.push("Parent");
        frame.push(format!("Count: {}", count));
        frame.push(format!("Subtitle: {}", subtitle));

        for (title, child) in [
            ("Shared child", self.observed.as_ref()),
            ("Owned child", self.owned.as_ref()),
        ] {
            let Some(child) = child else { continue };
            frame.push(title);
            frame.push(format!("Count: {}", child.get_as::<i64>("count")?));
            frame.push(child.get_as::<String>("subtitle")?);
        }

        Ok(frame)
    }

    pub fn increment_parent(&self) -> Result<i64, DemoError> {
        Ok(increment(&self.parent, 1)?)
    }

    pub fn decrement_parent(&self) -> Result<i64, DemoError> {
        Ok(increment(&self.parent, -1)?)
    }

    pub fn set_subtitle(&self, subtitle: &str) -> Result<(), DemoError> {
        Ok(self.parent.set("subtitle", subtitle)?)
    }

    pub fn increment_observed(&self) -> Result<i64, DemoError> {
        let child = self
            .observed
            .as_ref()
            .ok_or(DemoError::NotRendered { view: "observed" })?;
        Ok(increment(child, 1)?)
    }

    pub fn increment_owned(&self) -> Result<i64, DemoError> {
        let child = self
            .owned
            .as_ref()
            .ok_or(DemoError::NotRendered { view: "owned" })?;
        Ok(increment(child, 1)?)
    }
}

impl Drop for CounterDemo {
    fn drop(&mut self) {
        self.parent_subscription.unsubscribe();
        self.registry.teardown(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_render_builds_three_view_models() {
        let mut demo = CounterDemo::new(ScopeRegistry::new());
        let frame = demo.render().unwrap();

        assert_eq!(demo.constructions(), 3);
        assert!(frame.contains("Parent"));
        assert!(frame.contains("Shared child"));
        assert!(frame.contains("Owned child"));
    }

    #[test]
    fn test_child_ops_require_render() {
        let demo = CounterDemo::new(ScopeRegistry::new());
        assert!(matches!(
            demo.increment_observed(),
            Err(DemoError::NotRendered { view: "observed" })
        ));
        assert!(matches!(
            demo.increment_owned(),
            Err(DemoError::NotRendered { view: "owned" })
        ));
    }

    #[test]
    fn test_drop_tears_down_scopes() {
        let registry = ScopeRegistry::new();
        {
            let mut demo = CounterDemo::new(registry.clone());
            demo.render().unwrap();
            assert_eq!(registry.len(), 3);
        }
        assert!(registry.is_empty());
    }
}
