//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Handler trait, registry and explicitly constructed context
//! - 1.0.0: Initial add_task/list_tasks commands

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use crate::command_handler::CommandHandler;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

pub use slash::{
    create_slash_commands, get_string_option, register_global_commands, register_guild_commands,
};
