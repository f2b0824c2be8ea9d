//! Read-only projection of a task for display.
//!
//! A [`TaskViewModel`] is rebuilt from the authoritative [`Task`] whenever the
//! task list changes and is never mutated in place.

use crate::tasks::{Subtask, Task, TaskPriority, TaskStatus};
use chrono::prelude::*;
use ratatui::style::Color;

/// Display data for one task.
///
#[derive(Clone, Debug, PartialEq)]
pub struct TaskViewModel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub status_icon: &'static str,
    pub status_color: Color,
    pub priority: TaskPriority,
    pub priority_icon: &'static str,
    pub priority_color: Color,
    pub tags: Vec<String>,
    pub assignee: String,
    pub estimated_hours: u32,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    pub due_date: Option<String>,
    pub duration: Option<String>,
    pub subtasks: Vec<Subtask>,
    pub is_overdue: bool,
    pub progress: u8,
}

impl TaskViewModel {
    /// Project a domain task. `now` is used for the overdue flag.
    ///
    pub fn from_task(task: &Task, now: DateTime<Utc>) -> Self {
        TaskViewModel {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            status_icon: task.status.icon(),
            status_color: status_color(task.status),
            priority: task.priority,
            priority_icon: task.priority.badge(),
            priority_color: priority_color(task.priority),
            tags: task.labels.clone(),
            assignee: task.assignee.clone(),
            estimated_hours: task.estimated_hours,
            created_at: iso(task.created_at).unwrap_or_default(),
            updated_at: iso(task.updated_at).unwrap_or_default(),
            completed_at: iso(task.completed_at),
            due_date: iso(task.due_date),
            duration: duration(task),
            subtasks: task.subtasks.clone(),
            is_overdue: task.is_overdue(now),
            progress: progress(task),
        }
    }

    pub fn subtask_count(&self) -> usize {
        self.subtasks.len()
    }

    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    pub fn subtasks_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }
}

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Done => Color::Green,
        TaskStatus::Blocked => Color::Red,
        TaskStatus::Archived => Color::DarkGray,
    }
}

pub fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Critical => Color::Red,
        TaskPriority::High => Color::Rgb(255, 165, 0),
        TaskPriority::Medium => Color::Cyan,
        TaskPriority::Low => Color::Gray,
    }
}

fn iso(timestamp: Option<DateTime<Utc>>) -> Option<String> {
    timestamp.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn duration(task: &Task) -> Option<String> {
    if task.estimated_hours > 0 {
        return Some(format!("{}h", task.estimated_hours));
    }
    let elapsed = task.completed_at? - task.created_at?;
    if elapsed < chrono::Duration::zero() {
        return None;
    }
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() % 24;
    let minutes = elapsed.num_minutes() % 60;
    if days > 0 {
        Some(format!("{}d {}h", days, hours))
    } else {
        Some(format!("{}h {}m", hours, minutes))
    }
}

fn progress(task: &Task) -> u8 {
    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.done).count();
        return (done * 100 / task.subtasks.len()) as u8;
    }
    match task.status {
        TaskStatus::Done => 100,
        TaskStatus::InProgress => 50,
        _ => 0,
    }
}
