//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod tasks;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Every handler the bot serves, ready for `CommandRegistry::with_handlers`
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![Arc::new(tasks::TaskHandler)]
}
