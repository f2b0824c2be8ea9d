//! Navigation-related state types.
//!
//! This module contains the view stack entries and the list status filter.

use crate::tasks::{Task, TaskStatus};

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ActiveView {
    TaskList,
    TaskDetail,
    Search,
    Help,
}

/// Specifying which tasks the list shows.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Return the next filter in the cycle.
    ///
    pub fn next(&self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Todo),
            StatusFilter::Only(TaskStatus::Todo) => StatusFilter::Only(TaskStatus::InProgress),
            StatusFilter::Only(TaskStatus::InProgress) => StatusFilter::Only(TaskStatus::Done),
            StatusFilter::Only(TaskStatus::Done) => StatusFilter::Only(TaskStatus::Blocked),
            StatusFilter::Only(TaskStatus::Blocked) => StatusFilter::Only(TaskStatus::Archived),
            StatusFilter::Only(TaskStatus::Archived) => StatusFilter::All,
        }
    }

    /// Parse a filter name as typed on the command line. Unlike
    /// `TaskStatus::parse`, unknown names are rejected.
    ///
    pub fn parse(value: &str) -> Option<StatusFilter> {
        let value = value.trim().to_lowercase().replace('-', "_");
        if value == "all" {
            return Some(StatusFilter::All);
        }
        TaskStatus::ALL
            .iter()
            .find(|status| status.as_str() == value)
            .map(|status| StatusFilter::Only(*status))
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}
