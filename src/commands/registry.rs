//! Command name → handler lookup
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Warn when a registration shadows an existing command name
//! - 1.0.0: Initial implementation for handler dispatch

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SlashCommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of handlers
    pub fn with_handlers(handlers: Vec<Arc<dyn SlashCommandHandler>>) -> Self {
        let mut registry = Self::new();
        for handler in handlers {
            registry.register(handler);
        }
        registry
    }

    /// Register a handler under every name it declares. A later handler
    /// replaces an earlier one with the same name.
    pub fn register(&mut self, handler: Arc<dyn SlashCommandHandler>) {
        for name in handler.command_names() {
            if self.handlers.insert(name, Arc::clone(&handler)).is_some() {
                warn!("Command '/{name}' registered twice; keeping the latest handler");
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names (not distinct handlers)
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandContext;
    use anyhow::Result;
    use async_trait::async_trait;
    use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
    use serenity::prelude::Context;

    struct NamedHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl SlashCommandHandler for NamedHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            _serenity_ctx: &Context,
            _command: &ApplicationCommandInteraction,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("add_task").is_none());
    }

    #[test]
    fn test_handler_registered_under_all_names() {
        let registry = CommandRegistry::with_handlers(vec![Arc::new(NamedHandler {
            names: &["add_task", "list_tasks"],
        })]);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("add_task"));
        assert!(registry.contains("list_tasks"));
        assert!(!registry.contains("remind"));
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(NamedHandler { names: &["list_tasks"] }));
        registry.register(Arc::new(NamedHandler {
            names: &["list_tasks", "other"],
        }));

        assert_eq!(registry.len(), 2);
        let handler = registry.get("list_tasks").unwrap();
        assert_eq!(handler.command_names(), &["list_tasks", "other"]);
    }
}
