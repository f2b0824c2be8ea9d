use chrono::prelude::*;
use fake::Dummy;
use std::fmt;

/// Lifecycle status of a task.
///
#[derive(Clone, Copy, Debug, Default, Dummy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Blocked,
    Archived,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Blocked,
        TaskStatus::Archived,
    ];

    /// Parse a stored status. Unknown values fall back to todo.
    ///
    pub fn parse(value: &str) -> TaskStatus {
        match value.trim().to_lowercase().as_str() {
            "in_progress" | "in-progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            "blocked" => TaskStatus::Blocked,
            "archived" => TaskStatus::Archived,
            _ => TaskStatus::Todo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Archived => "archived",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "○",
            TaskStatus::InProgress => "●",
            TaskStatus::Done => "✓",
            TaskStatus::Blocked => "⊘",
            TaskStatus::Archived => "□",
        }
    }

    /// Return the status a toggle moves to.
    ///
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
            TaskStatus::Blocked => TaskStatus::InProgress,
            TaskStatus::Archived => TaskStatus::Todo,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority, ordered from most to least urgent.
///
#[derive(Clone, Copy, Debug, Default, Dummy, PartialEq, Eq, Hash)]
pub enum TaskPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    /// Parse a stored priority. Unknown values fall back to medium.
    ///
    pub fn parse(value: &str) -> TaskPriority {
        match value.trim().to_lowercase().as_str() {
            "critical" => TaskPriority::Critical,
            "high" => TaskPriority::High,
            "low" => TaskPriority::Low,
            _ => TaskPriority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "critical",
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "[CRIT]",
            TaskPriority::High => "[HIGH]",
            TaskPriority::Medium => "[MED]",
            TaskPriority::Low => "[LOW]",
        }
    }

    /// Sort weight, higher is more urgent.
    ///
    pub fn weight(&self) -> u8 {
        match self {
            TaskPriority::Critical => 4,
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Defines subtask data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Subtask {
    pub title: String,
    pub done: bool,
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub labels: Vec<String>,
    pub assignee: String,
    pub estimated_hours: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Return a minimal task, used by tests and benches.
    ///
    pub fn new(id: &str, title: &str) -> Self {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            labels: vec![],
            assignee: String::new(),
            estimated_hours: 0,
            created_at: None,
            updated_at: None,
            completed_at: None,
            due_date: None,
            subtasks: vec![],
        }
    }

    /// Move the task to a new status, keeping the completion timestamp in
    /// step.
    ///
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = Some(now);
        self.completed_at = match status {
            TaskStatus::Done => self.completed_at.or(Some(now)),
            _ => None,
        };
    }

    /// Return true if the due date has passed and the task is still open.
    ///
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        let open = !matches!(self.status, TaskStatus::Done | TaskStatus::Archived);
        open && self.due_date.map_or(false, |due| due < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn test_status_parse_and_fallback() {
        assert_eq!(TaskStatus::parse("in_progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse(" DONE "), TaskStatus::Done);
        assert_eq!(TaskStatus::parse("whatever"), TaskStatus::Todo);
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(TaskStatus::Todo.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.next(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Todo);
        assert_eq!(TaskStatus::Blocked.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Archived.next(), TaskStatus::Todo);
    }

    #[test]
    fn test_priority_parse_and_weight() {
        assert_eq!(TaskPriority::parse("critical"), TaskPriority::Critical);
        assert_eq!(TaskPriority::parse("urgent"), TaskPriority::Medium);
        assert!(TaskPriority::Critical.weight() > TaskPriority::High.weight());
        assert!(TaskPriority::Medium.weight() > TaskPriority::Low.weight());
        assert_eq!(TaskPriority::Low.badge(), "[LOW]");
    }

    #[test]
    fn test_set_status_tracks_completion() {
        let now = Utc::now();
        let mut task: Task = Faker.fake();
        task.completed_at = None;
        task.set_status(TaskStatus::Done, now);
        assert_eq!(task.completed_at, Some(now));
        assert_eq!(task.updated_at, Some(now));
        task.set_status(TaskStatus::Todo, now);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let mut task = Task::new("t", "Overdue");
        assert!(!task.is_overdue(now));
        task.due_date = Some(now - chrono::Duration::days(1));
        assert!(task.is_overdue(now));
        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(now));
    }
}
