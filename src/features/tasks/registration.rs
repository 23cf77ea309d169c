//! # Task Registration
//!
//! Validates an `/add_task` request, computes when the reminder fires and
//! appends the task to the store.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Fixed-offset time zone instead of host local time
//! - 1.0.0: Initial implementation

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::info;

use super::error::RegistrationError;
use super::model::{StoredTime, Task};
use super::store::TaskStore;
use crate::features::reminders::parse_lead_time;

/// Layout users type deadlines in (after separator normalisation)
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw command input for one registration
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub user_id: String,
    pub delivery_target_id: String,
    pub task_name: String,
    pub deadline_text: String,
    pub lead_time_text: String,
}

#[derive(Debug, Clone)]
pub struct TaskRegistrar {
    store: TaskStore,
    zone: FixedOffset,
}

impl TaskRegistrar {
    pub fn new(store: TaskStore, zone: FixedOffset) -> Self {
        Self { store, zone }
    }

    /// Validate and persist a task.
    ///
    /// `now` is read once by the caller and used for the whole validation.
    /// The store is written exactly once on success and never on failure.
    pub async fn register(
        &self,
        request: RegistrationRequest,
        now: DateTime<FixedOffset>,
    ) -> Result<Task, RegistrationError> {
        let task_name = request.task_name.trim();
        if task_name.is_empty() {
            return Err(RegistrationError::EmptyTaskName);
        }

        let deadline = parse_deadline(&request.deadline_text, self.zone)
            .ok_or_else(|| RegistrationError::InvalidDeadlineFormat(request.deadline_text.clone()))?;

        let lead_time = parse_lead_time(&request.lead_time_text)
            .ok_or_else(|| RegistrationError::InvalidLeadTime(request.lead_time_text.clone()))?;

        // Underflow only happens for absurd lead times, which are in the past anyway
        let notify_at = deadline
            .checked_sub_signed(lead_time)
            .ok_or_else(|| RegistrationError::InvalidLeadTime(request.lead_time_text.clone()))?;

        let now = now.with_timezone(&self.zone);
        if notify_at <= now {
            return Err(RegistrationError::NotifyTimeInPast { now, notify_at });
        }

        let task = Task {
            user_id: request.user_id,
            delivery_target_id: request.delivery_target_id,
            task_name: task_name.to_string(),
            deadline: StoredTime::from_datetime(deadline),
            notify_at: StoredTime::from_datetime(notify_at),
            lead_time_label: request.lead_time_text.trim().to_string(),
        };

        {
            let _guard = self.store.lock().await;
            let mut tasks = self.store.load_all().await;
            tasks.push(task.clone());
            self.store
                .save_all(&tasks)
                .await
                .map_err(RegistrationError::Store)?;
        }

        info!(
            "Registered task '{}' for user {} in {} (notify at {})",
            task.task_name,
            task.user_id,
            task.delivery_target_id,
            task.notify_at.raw()
        );

        Ok(task)
    }
}

/// Parse `YYYY-MM-DD HH:MM` in `zone`.
///
/// `/` is accepted as the date separator and a full-width colon as the time
/// separator, since both are common from Japanese IMEs.
pub fn parse_deadline(text: &str, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let normalized = text.trim().replace('/', "-").replace('：', ":");
    NaiveDateTime::parse_from_str(&normalized, DEADLINE_FORMAT)
        .ok()
        .and_then(|naive| naive.and_local_timezone(zone).single())
}

/// Confirmation shown after a successful registration
pub fn confirmation_message(task: &Task, zone: FixedOffset) -> String {
    let short = |time: &StoredTime| match time.resolve(zone) {
        Some(dt) => dt.format("%m/%d %H:%M").to_string(),
        None => time.raw().to_string(),
    };

    format!(
        "✅ 登録: **{}**\n締切: {}\n通知: {} ({}前)",
        task.task_name,
        short(&task.deadline),
        short(&task.notify_at),
        task.lead_time_label
    )
}
