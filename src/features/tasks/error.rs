//! Registration and delivery errors

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Why a registration request was refused.
///
/// Every variant except `Store` is the user's input; none of them leaves a
/// trace in the task file.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("task name is empty")]
    EmptyTaskName,

    #[error("deadline '{0}' does not match YYYY-MM-DD HH:MM")]
    InvalidDeadlineFormat(String),

    #[error("lead time '{0}' contains no day, hour or minute amount")]
    InvalidLeadTime(String),

    #[error("notify time {notify_at} is not after {now}")]
    NotifyTimeInPast {
        now: DateTime<FixedOffset>,
        notify_at: DateTime<FixedOffset>,
    },

    #[error("failed to persist task: {0:#}")]
    Store(anyhow::Error),
}

impl RegistrationError {
    /// Text shown to the user who issued the command
    pub fn user_message(&self) -> String {
        match self {
            RegistrationError::EmptyTaskName => {
                "⚠️ 課題名を入力してください。".to_string()
            }
            RegistrationError::InvalidDeadlineFormat(_) => {
                "⚠️ 日付形式エラー: `YYYY-MM-DD HH:MM` で入力してください。".to_string()
            }
            RegistrationError::InvalidLeadTime(_) => {
                "⚠️ 時間指定エラー: `1日` `3時間` `30分` のように入力してください。".to_string()
            }
            RegistrationError::NotifyTimeInPast { now, notify_at } => format!(
                "⚠️ 通知時間が過ぎています。\n現在時刻(UTC{}): {}\n通知予定: {}",
                now.format("%:z"),
                now.format("%m/%d %H:%M"),
                notify_at.format("%m/%d %H:%M")
            ),
            RegistrationError::Store(_) => {
                "⚠️ 保存に失敗しました。時間をおいて再度お試しください。".to_string()
            }
        }
    }
}

/// A reminder could not be handed to its delivery target
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery target '{0}' is not a valid channel id")]
    InvalidTarget(String),

    #[error("delivery to '{target}' rejected: {reason}")]
    Rejected { target: String, reason: String },
}
