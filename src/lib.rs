//! Observable state containers and the ownership patterns around them.
//!
//! - [`state`]: containers, subscriptions and the nested-container bridge.
//! - [`scope`]: dependent scopes with shared and owned-once binders.
//! - [`load`]: the async load state machine written into a container field.
//! - [`demos`]: the three ownership setups as renderable models.

pub mod config;
pub mod demos;
pub mod load;
pub mod logging;
pub mod mvi;
pub mod runner;
pub mod scope;
pub mod state;
