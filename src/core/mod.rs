//! # Core Module
//!
//! Configuration, time zone policy and Discord response utilities shared by
//! every feature.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add clock module (fixed-offset time policy)
//! - 1.1.0: Add interaction reply helpers to response module
//! - 1.0.0: Initial creation with config module

pub mod clock;
pub mod config;
pub mod response;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use response::{chunk_for_message, chunk_text, truncate_for_message, MESSAGE_LIMIT};
