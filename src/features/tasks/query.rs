//! Per-user task listing for `/list_tasks`

use chrono::FixedOffset;

use super::model::Task;
use super::store::TaskStore;

/// Shown when the caller has nothing registered
pub const EMPTY_LIST_MESSAGE: &str = "登録なし";

#[derive(Debug, Clone)]
pub struct TaskQuery {
    store: TaskStore,
}

impl TaskQuery {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Pending tasks owned by `user_id`, in registration order
    pub async fn list_for(&self, user_id: &str) -> Vec<Task> {
        self.store
            .load_all()
            .await
            .into_iter()
            .filter(|task| task.is_owned_by(user_id))
            .collect()
    }
}

/// Render a user's tasks as a bulleted list
pub fn render_task_list(tasks: &[Task], zone: FixedOffset) -> String {
    if tasks.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let mut msg = String::from("**📋 課題一覧**\n");
    for task in tasks {
        msg.push_str(&format!(
            "・**{}** (締切: {})\n",
            task.task_name,
            task.deadline.display(zone)
        ));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::jst;
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
    async fn test_list_only_returns_callers_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        store
            .save_all(&[
                task("alice", "1"),
                task("bob", "2"),
                task("alice", "3"),
                task("bob", "4"),
            ])
            .await
            .unwrap();

        let query = TaskQuery::new(store);
        let alice: Vec<_> = query
            .list_for("alice")
            .await
            .into_iter()
            .map(|t| t.task_name)
            .collect();
        assert_eq!(alice, vec!["1", "3"]);
        assert!(query.list_for("carol").await.is_empty());
    }

    #[tokio::test]
    async fn test_list_on_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let query = TaskQuery::new(TaskStore::new(dir.path().join("tasks.json")));
        assert!(query.list_for("alice").await.is_empty());
    }

    #[test]
    fn test_render_task_list() {
        assert_eq!(render_task_list(&[], jst()), EMPTY_LIST_MESSAGE);

        let rendered = render_task_list(&[task("a", "数学"), task("a", "英語")], jst());
        assert!(rendered.starts_with("**📋 課題一覧**\n"));
        assert!(rendered.contains("・**数学** (締切: 2024-05-20 23:59)\n"));
        assert!(rendered.contains("・**英語** (締切: 2024-05-20 23:59)\n"));
    }
}
