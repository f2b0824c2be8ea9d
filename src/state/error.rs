//! State management-specific error types.

/// Errors that can occur while executing a command line.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum StateError {
    /// Command not recognized
    #[error("Not an editor command: {0}")]
    UnknownCommand(String),

    /// Filter name not recognized
    #[error("Unknown filter: {0}")]
    InvalidFilter(String),

    /// Theme name not recognized
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Command given without its argument
    #[error("Argument required: {0}")]
    MissingArgument(&'static str),

    /// Task not found in state
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::UnknownCommand("wq".to_string());
        assert!(error.to_string().contains("Not an editor command"));
        assert!(error.to_string().contains("wq"));

        let error = StateError::InvalidFilter("someday".to_string());
        assert!(error.to_string().contains("Unknown filter: someday"));

        let error = StateError::UnknownTheme("solarized".to_string());
        assert_eq!(error.to_string(), "Unknown theme: solarized");

        let error = StateError::MissingArgument("filter");
        assert!(error.to_string().contains("filter"));

        let error = StateError::TaskNotFound {
            id: "task-1".to_string(),
        };
        assert!(error.to_string().contains("Task not found"));
        assert!(error.to_string().contains("task-1"));
    }
}
