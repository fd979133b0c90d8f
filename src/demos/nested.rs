//! Parent container holding a child container as a plain field.
//!
//! The parent view shows a header derived from the child's load phase; the
//! child view shows the child's content. Each view re-renders only when the
//! container it subscribes to notifies. The child's load mutates the child
//! only, so without a bridge the parent never re-renders and its header
//! keeps saying "not loaded" after the content has appeared.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::demos::{DemoError, Frame};
use crate::load::{LoadPhase, Loader};
use crate::scope::{ScopeKey, ScopeRegistry};
use crate::state::{bridge, ObservableState, StateError, Subscription, WeakState};

const VIEW_MODEL_SLOT: &str = "view_model";
const CHILD_FIELD: &str = "child";

fn header_lines(parent: &ObservableState) -> Result<Vec<String>, StateError> {
    let phase: LoadPhase = parent.nested(CHILD_FIELD)?.get_as("phase")?;
    let status = if phase.is_loaded() { "" } else { " not" };
    Ok(vec![
        "Top section".to_string(),
        format!("Child content is{} loaded", status),
    ])
}

fn child_lines(child: &ObservableState) -> Result<Vec<String>, StateError> {
    let phase: LoadPhase = child.get_as("phase")?;
    let mut lines = vec!["Child content".to_string()];
    match phase {
        LoadPhase::Loaded => lines.extend(["Item 0", "Item 1", "..."].map(String::from)),
        LoadPhase::Failed { reason } => lines.push(format!("Failed: {}", reason)),
        LoadPhase::NotLoaded | LoadPhase::Loading => lines.push("(loading)".to_string()),
    }
    Ok(lines)
}

/// A cached section of the screen, re-rendered by a subscriber.
#[derive(Clone, Default)]
struct Section {
    lines: Arc<Mutex<Vec<String>>>,
    renders: Arc<AtomicUsize>,
}

impl Section {
    fn rerender(
        &self,
        source: &WeakState,
        render: fn(&ObservableState) -> Result<Vec<String>, StateError>,
    ) {
        let Some(state) = source.upgrade() else {
            return;
        };
        match render(&state) {
            Ok(lines) => {
                *self.lines.lock() = lines;
                self.renders.fetch_add(1, Ordering::SeqCst);
            }
            Err(err) => tracing::warn!(state = %state.id(), error = %err, "Section render failed"),
        }
    }

    fn watch(
        &self,
        state: &ObservableState,
        render: fn(&ObservableState) -> Result<Vec<String>, StateError>,
    ) -> Subscription {
        let section = self.clone();
        let source = state.downgrade();
        section.rerender(&source, render);
        state.subscribe(move || section.rerender(&source, render))
    }
}

pub struct NestedDemo {
    registry: ScopeRegistry,
    root: ScopeKey,
    parent: ObservableState,
    child: ObservableState,
    loader: Loader,
    header: Section,
    content: Section,
    subscriptions: Vec<Subscription>,
    bridge: Option<Subscription>,
}

impl NestedDemo {
    /// Build the demo. With `bridged`, child changes are forwarded to the
    /// parent so the header stays current.
    pub fn new(registry: ScopeRegistry, bridged: bool, delay: Duration) -> Result<Self, DemoError> {
        let root = ScopeKey::new("nested");
        let scope = registry.activate(root.clone());

        let child_seed = ObservableState::builder()
            .label("nested.child")
            .field_as("phase", &LoadPhase::NotLoaded)?;
        let parent = scope
            .bind_owned_once(VIEW_MODEL_SLOT, move || {
                ObservableState::builder()
                    .label("nested.parent")
                    .field(CHILD_FIELD, child_seed.build())
                    .build()
            })
            .into_state();

        let child_scope = registry.activate(root.child(CHILD_FIELD));
        let child = child_scope
            .bind_shared(VIEW_MODEL_SLOT, &parent.nested(CHILD_FIELD)?)
            .into_state();
        let loader = Loader::new(child.clone(), "phase", delay)?;

        let bridge = if bridged {
            Some(bridge(&parent, CHILD_FIELD, &child)?)
        } else {
            None
        };

        let header = Section::default();
        let content = Section::default();
        let subscriptions = vec![
            header.watch(&parent, header_lines),
            content.watch(&child, child_lines),
        ];

        Ok(Self {
            registry,
            root,
            parent,
            child,
            loader,
            header,
            content,
            subscriptions,
            bridge,
        })
    }

    pub fn parent(&self) -> &ObservableState {
        &self.parent
    }

    pub fn child(&self) -> &ObservableState {
        &self.child
    }

    pub fn is_bridged(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn phase(&self) -> Result<LoadPhase, DemoError> {
        Ok(self.loader.phase()?)
    }

    /// First appearance: kick off the child load.
    pub async fn activate(&self) -> Result<(), DemoError> {
        self.registry.activate(self.root.clone());
        Ok(self.loader.load().await?)
    }

    /// Pull-to-refresh: the same load again.
    pub async fn refresh(&self) -> Result<(), DemoError> {
        Ok(self.loader.load().await?)
    }

    /// How many times the parent section has rendered, the initial render
    /// included.
    pub fn parent_renders(&self) -> usize {
        self.header.renders.load(Ordering::SeqCst)
    }

    pub fn child_renders(&self) -> usize {
        self.content.renders.load(Ordering::SeqCst)
    }

    /// What is on screen now: each section as of its last re-render.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new();
        frame.push("Nested");
        frame.extend(self.header.lines.lock().iter().cloned());
        frame.extend(self.content.lines.lock().iter().cloned());
        frame
    }
}

impl Drop for NestedDemo {
    fn drop(&mut self) {
        for subscription in self.subscriptions.iter().chain(self.bridge.iter()) {
            subscription.unsubscribe();
        }
        self.registry.teardown(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_frame() {
        let demo = NestedDemo::new(ScopeRegistry::new(), false, Duration::from_secs(1)).unwrap();
        let frame = demo.frame();

        assert!(frame.contains("Child content is not loaded"));
        assert!(frame.contains("(loading)"));
        assert_eq!(demo.parent_renders(), 1);
        assert_eq!(demo.child_renders(), 1);
    }

    #[test]
    fn test_child_is_parent_field() {
        let demo = NestedDemo::new(ScopeRegistry::new(), true, Duration::from_secs(1)).unwrap();
        assert_eq!(demo.parent().nested(CHILD_FIELD).unwrap().id(), demo.child().id());
        assert!(demo.is_bridged());
    }
}
