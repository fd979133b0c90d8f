//! Runnable reproductions of the three state-ownership setups.
//!
//! - [`counter`]: one parent container shared with a child that is rebuilt
//!   on every parent pass, next to a child that owns its container once.
//! - [`catalog`]: a keyed list whose cells own containers seeded from their
//!   item, which go stale when the item changes.
//! - [`nested`]: a parent holding a child container as a plain field, with
//!   and without a bridge.
//!
//! Each demo renders to a [`Frame`] of text lines instead of real views.

pub mod catalog;
pub mod counter;
pub mod nested;

use std::fmt;

use thiserror::Error;

use crate::load::LoadError;
use crate::state::StateError;

pub use catalog::{mock_items, CatalogDemo, Item, SENTINEL_PRICE};
pub use counter::CounterDemo;
pub use nested::NestedDemo;

/// Errors surfaced by demo operations.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to encode demo data: {0}")]
    Encode(#[from] serde_json::Error),

    /// An operation targeted a child view before its first render pass.
    #[error("View '{view}' has not been rendered yet")]
    NotRendered { view: &'static str },

    #[error("Offset {offset} is out of range for {len} items")]
    OffsetOutOfRange { offset: usize, len: usize },
}

/// Text output of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
