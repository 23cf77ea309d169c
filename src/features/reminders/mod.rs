//! # Reminders Feature
//!
//! Lead time parsing and the scheduled reminder dispatcher.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Delivery through the `ReminderSender` seam, at-most-once consumption
//! - 1.0.0: Initial release

pub mod duration;
pub mod scheduler;
pub mod sender;

pub use duration::parse_lead_time;
pub use scheduler::{reminder_message, ReminderScheduler, TickReport};
pub use sender::{DiscordSender, ReminderSender};
