//! On-disk task format.
//!
//! Task files are written by other tools and are not trusted: any field may be
//! missing or carry the wrong JSON type. They are deserialized loosely here and
//! then converted into [`Task`] with every string sanitized.

use super::resource::{Subtask, Task, TaskPriority, TaskStatus};
use crate::utils::text_processing::{sanitize_text, DEFAULT_MAX_LENGTH};
use chrono::prelude::*;
use serde::Deserialize;
use serde_json::Value;

const MAX_ESTIMATED_HOURS: i64 = 1000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct TaskFile {
    id: Value,
    title: Value,
    description: Value,
    status: Value,
    priority: Value,
    labels: Vec<Value>,
    assignee: Value,
    estimated_hours: Value,
    created_at: Value,
    updated_at: Value,
    completed_at: Value,
    due_date: Value,
    subtasks: Vec<SubtaskFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubtaskFile {
    title: Value,
    #[serde(alias = "completed")]
    done: bool,
}

impl TaskFile {
    pub(super) fn into_task(self) -> Task {
        Task {
            id: text(&self.id),
            title: text(&self.title),
            description: text(&self.description),
            status: TaskStatus::parse(&text(&self.status)),
            priority: TaskPriority::parse(&text(&self.priority)),
            labels: self
                .labels
                .iter()
                .map(text)
                .filter(|label| !label.is_empty())
                .collect(),
            assignee: text(&self.assignee),
            estimated_hours: hours(&self.estimated_hours),
            created_at: timestamp(&self.created_at),
            updated_at: timestamp(&self.updated_at),
            completed_at: timestamp(&self.completed_at),
            due_date: timestamp(&self.due_date),
            subtasks: self
                .subtasks
                .into_iter()
                .map(|s| Subtask {
                    title: text(&s.title),
                    done: s.done,
                })
                .collect(),
        }
    }
}

fn raw_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text(value: &Value) -> String {
    sanitize_text(&raw_string(value), DEFAULT_MAX_LENGTH)
}

fn hours(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or(0).clamp(0, MAX_ESTIMATED_HOURS) as u32
}

/// Parse RFC 3339 timestamps, naive ISO date-times (assumed UTC) and plain
/// dates.
///
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}
