//! Task record as persisted in the task file
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Accept legacy field names and numeric Discord ids on read
//! - 1.0.0: Initial record layout

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::clock::parse_stored;

/// A timestamp exactly as it sits in the store.
///
/// Kept verbatim so a single damaged value never makes the whole file
/// unreadable; it is resolved against the configured zone at use time.
/// `null`, numbers and a missing field all decode to a value that fails to
/// resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoredTime(String);

impl<'de> Deserialize<'de> for StoredTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        }))
    }
}

impl StoredTime {
    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Resolve to an absolute instant. Values without an offset are read in
    /// `zone`; `None` means the value is unusable.
    pub fn resolve(&self, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
        parse_stored(&self.0, zone).map(|dt| dt.with_timezone(&zone))
    }

    /// `YYYY-MM-DD HH:MM` in `zone`, or the raw value if it cannot be read
    pub fn display(&self, zone: FixedOffset) -> String {
        match self.resolve(zone) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => self.0.clone(),
        }
    }
}

impl From<&str> for StoredTime {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// A registered deadline reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(alias = "channel_id", deserialize_with = "id_string")]
    pub delivery_target_id: String,
    pub task_name: String,
    /// When the underlying task is due
    #[serde(alias = "deadline_str", default)]
    pub deadline: StoredTime,
    /// When the reminder fires (`deadline - lead time`)
    #[serde(alias = "notify_at_iso", default)]
    pub notify_at: StoredTime,
    /// Lead time as the user typed it, e.g. `1日2時間`
    #[serde(alias = "original_notify_str")]
    pub lead_time_label: String,
}

impl Task {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Discord snowflakes were written as JSON numbers by earlier versions
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{at, jst};

    #[test]
    fn test_stored_time_rfc3339() {
        let dt = at(jst(), 2024, 5, 19, 23, 59).unwrap();
        let stored = StoredTime::from_datetime(dt);
        assert_eq!(stored.raw(), "2024-05-19T23:59:00+09:00");
        assert_eq!(stored.resolve(jst()), Some(dt));
        assert_eq!(stored.display(jst()), "2024-05-19 23:59");
    }

    #[test]
    fn test_stored_time_display_falls_back_to_raw() {
        let stored = StoredTime::from("garbled");
        assert!(stored.resolve(jst()).is_none());
        assert_eq!(stored.display(jst()), "garbled");
    }

    #[test]
    fn test_display_converts_to_zone() {
        let stored = StoredTime::from("2024-05-19T14:59:00Z");
        assert_eq!(stored.display(jst()), "2024-05-19 23:59");
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "user_id": 123456789012345678,
            "channel_id": 876543210987654321,
            "task_name": "レポート提出",
            "deadline_str": "2024-05-20 23:59",
            "notify_at_iso": "2024-05-19T23:59:00+09:00",
            "original_notify_str": "1日"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.user_id, "123456789012345678");
        assert_eq!(task.delivery_target_id, "876543210987654321");
        assert_eq!(task.task_name, "レポート提出");
        assert_eq!(task.deadline.display(jst()), "2024-05-20 23:59");
        assert_eq!(task.lead_time_label, "1日");
    }

    #[test]
    fn test_damaged_timestamps_decode_as_unreadable() {
        let json = r#"{
            "user_id": "1",
            "delivery_target_id": "2",
            "task_name": "壊れた課題",
            "notify_at": null,
            "lead_time_label": "1日"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.notify_at.resolve(jst()).is_none());
        assert!(task.deadline.resolve(jst()).is_none());

        let numeric: StoredTime = serde_json::from_str("1716130740").unwrap();
        assert_eq!(numeric.raw(), "1716130740");
        assert!(numeric.resolve(jst()).is_none());
    }

    #[test]
    fn test_serialize_uses_current_field_names() {
        let task = Task {
            user_id: "1".to_string(),
            delivery_target_id: "2".to_string(),
            task_name: "課題".to_string(),
            deadline: StoredTime::from("2024-05-20T23:59:00+09:00"),
            notify_at: StoredTime::from("2024-05-19T23:59:00+09:00"),
            lead_time_label: "1日".to_string(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["delivery_target_id"], "2");
        assert_eq!(value["notify_at"], "2024-05-19T23:59:00+09:00");
        assert!(value.get("channel_id").is_none());
    }
}
