//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Built once at startup from `Config`; no process-wide state
//! - 1.0.0: Initial implementation with core shared state

use chrono::FixedOffset;
use std::sync::Arc;

use crate::core::clock::{Clock, SystemClock};
use crate::core::Config;
use crate::features::tasks::{TaskQuery, TaskRegistrar, TaskStore};

/// Services every command handler may use.
///
/// Constructed once in the bot binary and shared behind an `Arc`; the
/// reminder scheduler is built from the same store and clock so both paths
/// see one task file and one notion of "now".
#[derive(Clone)]
pub struct CommandContext {
    pub store: TaskStore,
    pub registrar: TaskRegistrar,
    pub query: TaskQuery,
    pub clock: Arc<dyn Clock>,
    pub zone: FixedOffset,
}

impl CommandContext {
    pub fn new(store: TaskStore, clock: Arc<dyn Clock>, zone: FixedOffset) -> Self {
        Self {
            registrar: TaskRegistrar::new(store.clone(), zone),
            query: TaskQuery::new(store.clone()),
            store,
            clock,
            zone,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TaskStore::new(config.tasks_file.clone()),
            Arc::new(SystemClock::new(config.time_zone)),
            config.time_zone,
        )
    }
}
