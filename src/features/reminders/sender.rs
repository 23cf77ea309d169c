//! Reminder delivery seam
//!
//! The scheduler only needs "post this text to that target, pinging only its
//! owner". Production posts through serenity's HTTP client; tests substitute a
//! recorder.

use async_trait::async_trait;
use serenity::builder::CreateAllowedMentions;
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};
use std::sync::Arc;

use crate::features::tasks::DeliveryError;

#[async_trait]
pub trait ReminderSender: Send + Sync {
    /// Post `text` to `target`. Only `owner` may be mentioned; any other
    /// mention in `text` (task names are user input) must stay inert.
    async fn send(&self, target: &str, owner: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Posts reminders to Discord text channels
pub struct DiscordSender {
    http: Arc<Http>,
}

impl DiscordSender {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReminderSender for DiscordSender {
    async fn send(&self, target: &str, owner: &str, text: &str) -> Result<(), DeliveryError> {
        let channel_id = snowflake(target)
            .map(ChannelId)
            .ok_or_else(|| DeliveryError::InvalidTarget(target.to_string()))?;
        let owner = snowflake(owner).map(UserId);

        channel_id
            .send_message(&self.http, |m| {
                m.content(text)
                    .allowed_mentions(|mentions| owner_only(mentions, owner))
            })
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Rejected {
                target: target.to_string(),
                reason: e.to_string(),
            })
    }
}

/// No `@everyone`, `@here` or role pings; at most the owner is notified
fn owner_only(
    mentions: &mut CreateAllowedMentions,
    owner: Option<UserId>,
) -> &mut CreateAllowedMentions {
    mentions.empty_parse().empty_roles();
    match owner {
        Some(user_id) => mentions.users(vec![user_id]),
        None => mentions.empty_users(),
    }
}

/// Discord ids are non-zero u64 snowflakes
fn snowflake(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}
