//! # Task Store
//!
//! Durable JSON file holding every pending task. The file is the only shared
//! mutable state in the bot: there is no update-in-place, every change loads
//! the whole set and writes the whole set back.
//!
//! Writers in this process serialise through [`TaskStore::lock`]. Nothing
//! guards against a second process writing the same file.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Per-record decoding; undecodable records survive rewrites
//! - 1.1.0: Atomic replace through a sibling temp file, in-process write lock
//! - 1.0.0: Load/save of the full task list

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::model::Task;

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hold this across a load → mutate → save sequence so two operations in
    /// this process never interleave their rewrites.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Load every stored task in insertion order.
    ///
    /// A missing, unreadable or corrupt file yields an empty list; the problem
    /// is logged and never surfaced to callers. Records are decoded one by one,
    /// so a single bad record only hides itself.
    pub async fn load_all(&self) -> Vec<Task> {
        let records = match self.read_records().await {
            FileContents::Records(records) => records,
            FileContents::Absent | FileContents::Corrupt => return Vec::new(),
        };

        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(
                        "Skipping undecodable record #{index} in {} (kept in file): {e}",
                        self.path.display()
                    );
                    None
                }
            })
            .collect()
    }

    /// Replace the stored set with `tasks`.
    ///
    /// Written to a temp file next to the target and renamed over it, so a
    /// reader sees either the old or the new set, never a torn write.
    ///
    /// Records [`load_all`](Self::load_all) could not decode are carried over
    /// after `tasks`. A file that is not a JSON array at all is copied to a
    /// `.corrupt` sibling before it is replaced.
    pub async fn save_all(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        let mut records = tasks
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()
            .context("serializing tasks")?;

        match self.read_records().await {
            FileContents::Records(existing) => {
                let kept: Vec<Value> = existing
                    .into_iter()
                    .filter(|record| serde_json::from_value::<Task>(record.clone()).is_err())
                    .collect();
                if !kept.is_empty() {
                    debug!("Carrying over {} undecodable record(s)", kept.len());
                }
                records.extend(kept);
            }
            FileContents::Corrupt => {
                let backup = self.sibling_path("corrupt");
                tokio::fs::copy(&self.path, &backup)
                    .await
                    .with_context(|| format!("backing up {}", self.path.display()))?;
                warn!(
                    "Replacing corrupt task file {}; previous contents saved to {}",
                    self.path.display(),
                    backup.display()
                );
            }
            FileContents::Absent => {}
        }

        let json = serde_json::to_string_pretty(&records).context("serializing tasks")?;
        let tmp_path = self.temp_path();

        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;

        debug!("Saved {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }

    async fn read_records(&self) -> FileContents {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Task file {} does not exist yet", self.path.display());
                return FileContents::Absent;
            }
            Err(e) => {
                warn!("Failed to read task file {}: {e}", self.path.display());
                return FileContents::Absent;
            }
        };

        if contents.trim().is_empty() {
            return FileContents::Absent;
        }

        match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(records) => FileContents::Records(records),
            Err(e) => {
                warn!(
                    "Task file {} is corrupt, treating as empty: {e}",
                    self.path.display()
                );
                FileContents::Corrupt
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path("tmp")
    }

    fn sibling_path(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tasks.json".into());
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }
}

enum FileContents {
    /// Missing, blank or unreadable
    Absent,
    Records(Vec<Value>),
    /// Not a JSON array
    Corrupt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tasks::model::StoredTime;

    fn task(user: &str, name: &str) -> Task {
        Task {
            user_id: user.to_string(),
            delivery_target_id: "channel-1".to_string(),
            task_name: name.to_string(),
            deadline: StoredTime::from("2024-05-20T23:59:00+09:00"),
            notify_at: StoredTime::from("2024-05-19T23:59:00+09:00"),
            lead_time_label: "1日".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        assert!(store.load_all().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        let tasks = vec![task("a", "数学"), task("b", "英語"), task("a", "物理")];

        store.save_all(&tasks).await.unwrap();
        assert_eq!(store.load_all().await, tasks);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));

        store.save_all(&[task("a", "1"), task("a", "2")]).await.unwrap();
        store.save_all(&[task("b", "3")]).await.unwrap();

        let loaded = store.load_all().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].task_name, "3");
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty_and_is_backed_up_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = TaskStore::new(&path);
        assert!(store.load_all().await.is_empty());

        store.save_all(&[task("a", "新規")]).await.unwrap();
        assert_eq!(store.load_all().await.len(), 1);
        let backup = std::fs::read_to_string(dir.path().join("tasks.json.corrupt")).unwrap();
        assert_eq!(backup, "{ not json");
    }

    #[tokio::test]
    async fn test_bad_record_does_not_hide_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[
                {"user_id": "a", "delivery_target_id": "c", "task_name": "keep-me",
                 "deadline": "2024-05-20T23:59:00+09:00",
                 "notify_at": "2024-05-19T23:59:00+09:00", "lead_time_label": "1日"},
                {"user_id": "a", "delivery_target_id": "c", "task_name": "null-time",
                 "deadline": null, "notify_at": null, "lead_time_label": "1日"},
                {"user_id": "a", "notify_at": "2024-05-19T23:59:00+09:00"}
            ]"#,
        )
        .unwrap();
        let store = TaskStore::new(&path);

        let loaded = store.load_all().await;
        let names: Vec<_> = loaded.iter().map(|t| t.task_name.as_str()).collect();
        assert_eq!(names, vec!["keep-me", "null-time"]);
        assert!(loaded[1].notify_at.resolve(crate::core::clock::jst()).is_none());

        // The record with no name or target survives a rewrite verbatim
        store.save_all(&loaded[..1]).await.unwrap();
        let raw: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["task_name"], "keep-me");
        assert!(raw[1].get("task_name").is_none());
        assert_eq!(raw[1]["user_id"], "a");
    }

    #[tokio::test]
    async fn test_file_is_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let store = TaskStore::new(&path);
        store.save_all(&[task("a", "レポート")]).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"task_name\": \"レポート\""));
        assert!(raw.contains("\"lead_time_label\": \"1日\""));
    }
}
