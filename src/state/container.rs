//! Observable state container with change notification.
//!
//! [`ObservableState`] is a cheap-to-clone handle to a shared record of named
//! fields. Cloning the handle never creates a new container: both handles
//! share the same id, fields and subscribers. Only [`ObservableState::new`]
//! (or the builder) allocates a container, and every allocation gets a fresh
//! [`StateId`].
//!
//! # Notification
//!
//! Every write notifies all subscribers registered at the time of the write,
//! synchronously, before `set` returns. Notification carries no payload and
//! happens even when the written value equals the old one.
//!
//! # Re-entrancy
//!
//! No lock is held while callbacks run, so a subscriber may read, write,
//! subscribe or unsubscribe on the same container. Unbounded recursion from
//! a subscriber that writes on every notification is the caller's problem.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::state::error::StateError;
use crate::state::subscription::{SubscriberId, Subscription};
use crate::state::value::FieldValue;

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique container identity. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u64);

impl StateId {
    fn next() -> Self {
        Self(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0)
    }
}

type Callback = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct StateInner {
    id: StateId,
    label: Option<String>,
    fields: RwLock<BTreeMap<String, FieldValue>>,
    subscribers: Mutex<Vec<(SubscriberId, Callback)>>,
    next_subscriber: AtomicU64,
}

impl StateInner {
    /// Returns true if a subscriber was removed.
    pub(crate) fn remove_subscriber(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    pub(crate) fn has_subscriber(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().iter().any(|(sub, _)| *sub == id)
    }

    fn notify(&self) {
        // Snapshot so callbacks run without the lock held.
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        tracing::trace!(state = %self.id, subscribers = callbacks.len(), "Notifying subscribers");

        for callback in callbacks {
            callback();
        }
    }
}

/// Shared, observable record of named fields.
///
/// The field set is fixed at creation; reading or writing any other name
/// fails with [`StateError::UnknownField`].
#[derive(Clone)]
pub struct ObservableState {
    inner: Arc<StateInner>,
}

impl ObservableState {
    /// Allocate a new container with the given initial fields.
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::with_label(None, fields)
    }

    /// Start building a container field by field.
    pub fn builder() -> StateBuilder {
        StateBuilder::default()
    }

    fn with_label<I, K, V>(label: Option<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields: BTreeMap<String, FieldValue> = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        let id = StateId::next();
        tracing::trace!(
            state = %id,
            label = label.as_deref().unwrap_or(""),
            fields = fields.len(),
            "Container created"
        );

        Self {
            inner: Arc::new(StateInner {
                id,
                label,
                fields: RwLock::new(fields),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(1),
            }),
        }
    }

    pub fn id(&self) -> StateId {
        self.inner.id
    }

    /// Names of all fields, in sorted order.
    pub fn field_names(&self) -> Vec<String> {
        self.inner.fields.read().keys().cloned().collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.inner.fields.read().contains_key(field)
    }

    /// Read the current value of a field.
    pub fn get(&self, field: &str) -> Result<FieldValue, StateError> {
        self.inner
            .fields
            .read()
            .get(field)
            .cloned()
            .ok_or_else(|| self.unknown_field(field))
    }

    /// Read a data field as raw JSON.
    pub fn get_data(&self, field: &str) -> Result<serde_json::Value, StateError> {
        match self.get(field)? {
            FieldValue::Data(value) => Ok(value),
            FieldValue::Nested(_) => Err(StateError::NotData {
                state: self.id(),
                field: field.to_string(),
            }),
        }
    }

    /// Read a data field and decode it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Result<T, StateError> {
        let value = self.get_data(field)?;
        serde_json::from_value(value).map_err(|source| StateError::Decode {
            state: self.id(),
            field: field.to_string(),
            source,
        })
    }

    /// Return the container referenced by a nested field.
    pub fn nested(&self, field: &str) -> Result<ObservableState, StateError> {
        match self.get(field)? {
            FieldValue::Nested(state) => Ok(state),
            FieldValue::Data(_) => Err(StateError::NotNested {
                state: self.id(),
                field: field.to_string(),
            }),
        }
    }

    /// Write a field and notify every subscriber.
    pub fn set(&self, field: &str, value: impl Into<FieldValue>) -> Result<(), StateError> {
        {
            let mut fields = self.inner.fields.write();
            let slot = fields
                .get_mut(field)
                .ok_or_else(|| self.unknown_field(field))?;
            *slot = value.into();
        }

        tracing::trace!(state = %self.id(), field, "Field set");
        self.inner.notify();
        Ok(())
    }

    /// Encode `value` and write it to a field.
    pub fn set_as<T: Serialize + ?Sized>(&self, field: &str, value: &T) -> Result<(), StateError> {
        let encoded = serde_json::to_value(value).map_err(|source| StateError::Encode {
            state: self.id(),
            field: field.to_string(),
            source,
        })?;
        self.set(field, encoded)
    }

    /// Read-modify-write a data field as `T`, producing one notification.
    ///
    /// The closure runs without any lock held.
    pub fn update_as<T, R>(&self, field: &str, f: impl FnOnce(&mut T) -> R) -> Result<R, StateError>
    where
        T: DeserializeOwned + Serialize,
    {
        let mut value: T = self.get_as(field)?;
        let result = f(&mut value);
        self.set_as(field, &value)?;
        Ok(result)
    }

    /// Notify subscribers without touching any field.
    pub fn notify(&self) {
        self.inner.notify();
    }

    /// Register a change listener.
    ///
    /// Registrations are independent: subscribing the same closure twice
    /// yields two notifications per change.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = SubscriberId::new(self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers.lock().push((id, Arc::new(callback)));
        Subscription::new(Arc::downgrade(&self.inner), self.id(), id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Non-owning handle to this container.
    pub fn downgrade(&self) -> WeakState {
        WeakState {
            inner: Arc::downgrade(&self.inner),
            id: self.id(),
        }
    }

    fn unknown_field(&self, field: &str) -> StateError {
        StateError::UnknownField {
            state: self.id(),
            field: field.to_string(),
        }
    }
}

impl fmt::Debug for ObservableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableState")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("fields", &*self.inner.fields.read())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

/// Weak reference to a container; does not keep it alive.
#[derive(Clone)]
pub struct WeakState {
    inner: Weak<StateInner>,
    id: StateId,
}

impl WeakState {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn upgrade(&self) -> Option<ObservableState> {
        self.inner.upgrade().map(|inner| ObservableState { inner })
    }
}

impl fmt::Debug for WeakState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakState")
            .field("id", &self.id)
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Fluent constructor for [`ObservableState`].
#[derive(Default)]
pub struct StateBuilder {
    label: Option<String>,
    fields: Vec<(String, FieldValue)>,
}

impl StateBuilder {
    /// Human-readable name used in logs.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a field from any serializable value.
    pub fn field_as<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_value(value)?;
        self.fields.push((name.into(), FieldValue::Data(encoded)));
        Ok(self)
    }

    pub fn build(self) -> ObservableState {
        ObservableState::with_label(self.label, self.fields)
    }
}
