//! # Reminder Scheduler
//!
//! Periodic dispatcher: every tick it loads the task file, posts every task
//! whose notify time has been reached and rewrites the file with the rest.
//!
//! Delivery is at-most-once. Due tasks are removed from the file before any
//! message goes out, and a failed delivery is logged, not retried. The store
//! lock is released before delivery starts.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Consume due tasks before delivery; keep tasks with unreadable timestamps
//! - 1.1.0: Fixed-offset time zone, injected clock and sender
//! - 1.0.0: Initial 60 second polling loop

use chrono::{DateTime, FixedOffset};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::sender::ReminderSender;
use crate::core::clock::Clock;
use crate::core::response::truncate_for_message;
use crate::features::tasks::{Task, TaskStore};

/// Outcome of a single tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Tasks kept because their notify time could not be read
    pub unreadable: usize,
    pub remaining: usize,
}

pub struct ReminderScheduler {
    store: TaskStore,
    sender: Arc<dyn ReminderSender>,
    clock: Arc<dyn Clock>,
    zone: FixedOffset,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        store: TaskStore,
        sender: Arc<dyn ReminderSender>,
        clock: Arc<dyn Clock>,
        zone: FixedOffset,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            sender,
            clock,
            zone,
            interval,
        }
    }

    /// Spawn the polling loop. It stops once `shutdown` flips to `true` or
    /// its sender is dropped.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Reminder scheduler started (interval: {}s, store: {})",
            self.interval.as_secs(),
            self.store.path().display()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.tick().await;
                    if report.due > 0 {
                        info!(
                            "Reminder tick: {} due, {} delivered, {} failed, {} remaining",
                            report.due, report.delivered, report.failed, report.remaining
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Reminder scheduler stopped");
    }

    /// Run one tick against the clock's current time
    pub async fn tick(&self) -> TickReport {
        let now = self.clock.now().with_timezone(&self.zone);
        self.tick_at(now).await
    }

    /// Run one tick with an explicit evaluation time
    pub async fn tick_at(&self, now: DateTime<FixedOffset>) -> TickReport {
        let guard = self.store.lock().await;

        let tasks = self.store.load_all().await;
        if tasks.is_empty() {
            return TickReport::default();
        }

        let mut report = TickReport::default();
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(tasks.len());

        for task in tasks {
            match task.notify_at.resolve(self.zone) {
                Some(notify_at) if now >= notify_at => due.push(task),
                Some(_) => pending.push(task),
                None => {
                    warn!(
                        "Keeping task '{}' for user {}: unreadable notify time '{}'",
                        task.task_name,
                        task.user_id,
                        task.notify_at.raw()
                    );
                    report.unreadable += 1;
                    pending.push(task);
                }
            }
        }

        report.due = due.len();
        report.remaining = pending.len();

        if due.is_empty() {
            debug!("Reminder tick: nothing due ({} pending)", pending.len());
            return report;
        }

        // Persist first: if this fails nothing is sent and the tasks stay due
        if let Err(e) = self.store.save_all(&pending).await {
            error!("Failed to remove {} due task(s) from store, skipping delivery: {e:#}", due.len());
            report.remaining += due.len();
            return report;
        }
        // Due tasks are out of the file; registrations need not wait on delivery
        drop(guard);

        for task in &due {
            let text = reminder_message(task, self.zone);
            match self
                .sender
                .send(&task.delivery_target_id, &task.user_id, &text)
                .await
            {
                Ok(()) => {
                    info!(
                        "Delivered reminder '{}' to user {} in {}",
                        task.task_name, task.user_id, task.delivery_target_id
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!("Dropping reminder '{}': {e}", task.task_name);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Message posted when a task comes due
pub fn reminder_message(task: &Task, zone: FixedOffset) -> String {
    truncate_for_message(&format!(
        "<@{}> 🔔 **{}** の締切が **{}前** です！\n(締切: {})",
        task.user_id,
        task.task_name,
        task.lead_time_label,
        task.deadline.display(zone)
    ))
}
