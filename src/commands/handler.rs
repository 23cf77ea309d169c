//! Slash command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// Processes one or more slash commands.
///
/// Handlers are registered with a `CommandRegistry` and looked up by the
/// interaction's command name. Replying (including the deferred
/// acknowledgement) is the handler's job; an `Err` means the handler could
/// not run at all and the dispatcher should log it.
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command names this handler answers to
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}
