// Core layer - configuration, time policy, Discord response helpers
pub mod core;

// Features layer - tasks, reminders, keep-alive
pub mod features;

// Application layer
pub mod command_handler;
pub mod commands;

pub use crate::core::Config;

pub use features::{
    // Keep alive
    KeepAliveServer,
    // Reminders
    DiscordSender, ReminderScheduler, ReminderSender, TickReport,
    // Tasks
    RegistrationError, Task, TaskQuery, TaskRegistrar, TaskStore,
};
