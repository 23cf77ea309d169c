use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use deadline_bot::commands::{
    register_global_commands, register_guild_commands, CommandContext, CommandHandler,
};
use deadline_bot::core::Config;
use deadline_bot::features::keep_alive::KeepAliveServer;
use deadline_bot::features::reminders::{DiscordSender, ReminderScheduler};

struct Handler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
    reminder_interval: Duration,
    /// Cleared on the first Ready; reconnects must not redo setup
    first_ready: AtomicBool,
    shutdown: watch::Receiver<bool>,
    scheduler_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Handler {
    async fn register_commands(&self, ctx: &Context) {
        let result = match self.guild_id {
            Some(guild_id) => register_guild_commands(ctx, guild_id).await,
            None => register_global_commands(ctx).await,
        };
        if let Err(e) = result {
            error!("Failed to register slash commands: {e:#}");
        }
    }

    async fn start_scheduler(&self, ctx: &Context) {
        let app = self.command_handler.context();
        let scheduler = ReminderScheduler::new(
            app.store.clone(),
            Arc::new(DiscordSender::new(ctx.http.clone())),
            app.clock.clone(),
            app.zone,
            self.reminder_interval,
        );
        let handle = scheduler.spawn(self.shutdown.clone());
        *self.scheduler_task.lock().await = Some(handle);
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        if !self.first_ready.swap(false, Ordering::SeqCst) {
            info!("Reconnected; commands and reminder scheduler already running");
            return;
        }

        self.register_commands(&ctx).await;
        self.start_scheduler(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        if let Err(e) = self
            .command_handler
            .handle_slash_command(&ctx, &command)
            .await
        {
            error!("Error handling slash command '{}': {e:#}", command.data.name);

            // Best effort: the reply window may already be gone
            let _ = command
                .edit_original_interaction_response(&ctx.http, |response| {
                    response.content("❌ エラーが発生しました。もう一度お試しください。")
                })
                .await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!(
        "Starting deadline reminder bot (UTC{}, store: {})",
        config.time_zone,
        config.tasks_file.display()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // The hosting platform polls this even while the gateway is connecting
    match KeepAliveServer::bind(config.port).await {
        Ok(server) => {
            tokio::spawn(server.serve(shutdown_rx.clone()));
        }
        Err(e) => error!("Keep-alive server unavailable: {e:#}"),
    }

    let Some(token) = config.discord_token.clone() else {
        error!("DISCORD_BOT_TOKEN is not set");
        error!("Set it in the environment or in a .env file next to the binary");
        return Err(anyhow::anyhow!("DISCORD_BOT_TOKEN is not set"));
    };

    let command_handler = CommandHandler::new(CommandContext::from_config(&config));

    // Guild-scoped registration is instant, use it during development
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let scheduler_task = Arc::new(Mutex::new(None));
    let handler = Handler {
        command_handler: Arc::new(command_handler),
        guild_id,
        reminder_interval: config.reminder_interval(),
        first_ready: AtomicBool::new(true),
        shutdown: shutdown_rx,
        scheduler_task: scheduler_task.clone(),
    };

    let mut client = Client::builder(&token, GatewayIntents::GUILDS)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, disconnecting from Discord");
            shard_manager.lock().await.shutdown_all().await;
        }
    });

    info!("Connecting to Discord gateway...");
    let result = client.start().await;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = scheduler_task.lock().await.take() {
        let _ = handle.await;
    }

    if let Err(why) = result {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    info!("Bot stopped");
    Ok(())
}
