//! Concrete views.

pub mod help;
pub mod search;
pub mod task_detail;
pub mod task_list;

pub use help::HelpView;
pub use search::SearchView;
pub use task_detail::{DetailSection, TaskDetailView};
pub use task_list::{ListOptions, TaskListView};
