use std::fmt;

use crate::state::ObservableState;

/// Value stored in a container field.
///
/// `Nested` is a plain reference to another container. Mutations inside the
/// nested container are invisible to the outer container's subscribers
/// unless the two are joined with [`bridge`](crate::state::bridge).
#[derive(Clone)]
pub enum FieldValue {
    Data(serde_json::Value),
    Nested(ObservableState),
}

// Nested values compare by container identity, never by contents.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Data(a), FieldValue::Data(b)) => a == b,
            (FieldValue::Nested(a), FieldValue::Nested(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Data(value) => write!(f, "{}", value),
            // Only the id, so cyclic-looking graphs never recurse.
            FieldValue::Nested(state) => write!(f, "Nested({})", state.id()),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Data(value)
    }
}

impl From<ObservableState> for FieldValue {
    fn from(state: ObservableState) -> Self {
        FieldValue::Nested(state)
    }
}

impl From<&ObservableState> for FieldValue {
    fn from(state: &ObservableState) -> Self {
        FieldValue::Nested(state.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Data(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Data(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Data(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Data(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Data(value.into())
    }
}
