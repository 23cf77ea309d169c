//! Environment-driven configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Configurable time zone offset and reminder interval
//! - 1.0.0: Token, port and task file from environment

use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::path::PathBuf;

/// Default liveness port when `PORT` is unset
pub const DEFAULT_PORT: u16 = 8080;
/// Default store location, relative to the working directory
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";
/// JST
pub const DEFAULT_TZ_OFFSET_HOURS: i32 = 9;
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when `DISCORD_BOT_TOKEN` is missing; the bot binary reports it
    /// before attempting to connect.
    pub discord_token: Option<String>,
    pub discord_guild_id: Option<String>,
    pub port: u16,
    pub tasks_file: PathBuf,
    /// The deployment-wide time zone every timestamp comparison uses
    pub time_zone: FixedOffset,
    pub reminder_interval_secs: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let tz_offset_hours = match non_empty("TZ_OFFSET_HOURS") {
            Some(raw) => raw
                .parse::<i32>()
                .with_context(|| format!("TZ_OFFSET_HOURS must be an integer, got '{raw}'"))?,
            None => DEFAULT_TZ_OFFSET_HOURS,
        };
        let time_zone = FixedOffset::east_opt(tz_offset_hours * 3600).ok_or_else(|| {
            anyhow::anyhow!("TZ_OFFSET_HOURS out of range (-23..=23): {tz_offset_hours}")
        })?;

        let reminder_interval_secs = match non_empty("REMINDER_INTERVAL_SECS") {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("REMINDER_INTERVAL_SECS must be a positive integer, got '{raw}'")
            })?,
            None => DEFAULT_REMINDER_INTERVAL_SECS,
        };
        if reminder_interval_secs == 0 {
            anyhow::bail!("REMINDER_INTERVAL_SECS must be greater than zero");
        }

        Ok(Config {
            discord_token: non_empty("DISCORD_BOT_TOKEN"),
            discord_guild_id: non_empty("DISCORD_GUILD_ID"),
            port,
            tasks_file: non_empty("TASKS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TASKS_FILE)),
            time_zone,
            reminder_interval_secs,
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn reminder_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reminder_interval_secs)
    }
}
