//! Interaction dispatch
//!
//! Routes each incoming slash command to the handler registered for its name.

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;

#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        Self::with_registry(context, CommandRegistry::with_handlers(create_all_handlers()))
    }

    pub fn with_registry(context: CommandContext, registry: CommandRegistry) -> Self {
        Self {
            context: Arc::new(context),
            registry,
        }
    }

    pub fn context(&self) -> &Arc<CommandContext> {
        &self.context
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{request_id}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {guild_id}",
            command.data.name, command.user.id, command.channel_id
        );

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("[{request_id}] No handler registered for '/{}'", command.data.name);
            return Ok(());
        };

        if let Err(e) = handler.handle(self.context.clone(), ctx, command).await {
            error!("[{request_id}] Handler for '/{}' failed: {e:#}", command.data.name);
            return Err(e);
        }

        debug!(
            "[{request_id}] ✅ '/{}' completed in {:?}",
            command.data.name,
            started.elapsed()
        );
        Ok(())
    }
}
