//! # Features
//!
//! - **tasks**: registration, storage and listing of deadline tasks
//! - **reminders**: lead time parsing and the reminder dispatcher
//! - **keep_alive**: liveness endpoint for the hosting platform

pub mod keep_alive;
pub mod reminders;
pub mod tasks;

pub use keep_alive::KeepAliveServer;
pub use reminders::{parse_lead_time, DiscordSender, ReminderScheduler, ReminderSender, TickReport};
pub use tasks::{
    DeliveryError, RegistrationError, RegistrationRequest, StoredTime, Task, TaskQuery,
    TaskRegistrar, TaskStore,
};
