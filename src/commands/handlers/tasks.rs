//! Deadline task command handlers
//!
//! Handles: add_task, list_tasks
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Defer ephemerally before touching the store
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::core::response::{defer_ephemeral, send_followup};
use crate::features::tasks::{confirmation_message, render_task_list, RegistrationRequest};

/// Handler for `/add_task` and `/list_tasks`
pub struct TaskHandler;

#[async_trait]
impl SlashCommandHandler for TaskHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add_task", "list_tasks"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        // Store I/O can outlast the 3 second reply window, acknowledge first
        if !defer_ephemeral(&serenity_ctx.http, command).await {
            return Ok(());
        }

        let reply = match command.data.name.as_str() {
            "add_task" => {
                let option = |name: &str| {
                    get_string_option(&command.data.options, name).unwrap_or_default()
                };
                let request = RegistrationRequest {
                    user_id: command.user.id.to_string(),
                    delivery_target_id: command.channel_id.to_string(),
                    task_name: option("task_name"),
                    deadline_text: option("deadline"),
                    lead_time_text: option("notify_before"),
                };
                Self::add_task_reply(&ctx, request).await
            }
            "list_tasks" => Self::list_tasks_reply(&ctx, &command.user.id.to_string()).await,
            _ => return Ok(()),
        };

        send_followup(&serenity_ctx.http, command, &reply).await;
        Ok(())
    }
}

impl TaskHandler {
    /// Register a task and build the reply text
    pub async fn add_task_reply(ctx: &CommandContext, request: RegistrationRequest) -> String {
        let user_id = request.user_id.clone();
        let now = ctx.clock.now();

        match ctx.registrar.register(request, now).await {
            Ok(task) => confirmation_message(&task, ctx.zone),
            Err(e) => {
                info!("Rejected add_task from user {user_id}: {e}");
                e.user_message()
            }
        }
    }

    /// Build the `/list_tasks` reply for `user_id`
    pub async fn list_tasks_reply(ctx: &CommandContext, user_id: &str) -> String {
        let tasks = ctx.query.list_for(user_id).await;
        debug!("User {user_id} has {} pending task(s)", tasks.len());
        render_task_list(&tasks, ctx.zone)
    }
}
