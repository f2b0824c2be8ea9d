//! Domain tasks and the read-only task source.

pub mod error;
mod models;
mod resource;
pub mod search;

pub use error::TaskSourceError;
pub use resource::*;
pub use search::{rank, SearchResult};

use log::*;
use models::TaskFile;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

pub const MAX_FILE_SIZE: u64 = 1024 * 1024;
pub const MAX_TASKS: usize = 1000;
const CORRUPTED_PREFIX: &str = "corrupted-";

/// Responsible for reading task JSON files from a directory and transforming
/// them into sanitized [`Task`]s. The store never writes.
///
#[derive(Clone, Debug)]
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        TaskStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every readable task, sorted by priority (most urgent first) and
    /// then newest first. Files that cannot be used are skipped with a
    /// warning. A missing directory yields no tasks.
    ///
    pub async fn load_all(&self) -> Result<Vec<Task>, TaskSourceError> {
        debug!("Loading tasks from {}...", self.dir.display());
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            info!("Tasks directory {} does not exist", self.dir.display());
            return Ok(vec![]);
        }

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|source| TaskSourceError::ReadDir {
                path: self.dir.clone(),
                source,
            })?;

        let mut paths = vec![];
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => paths.push(entry.path()),
                Ok(None) => break,
                Err(source) => {
                    return Err(TaskSourceError::ReadDir {
                        path: self.dir.clone(),
                        source,
                    })
                }
            }
        }
        paths.sort();

        let mut tasks = vec![];
        for path in paths.into_iter().filter(|p| is_task_file(p)) {
            match load_file(&path).await {
                Ok(task) => tasks.push(task),
                Err(e) => warn!("Skipping task file: {}", e),
            }
        }

        sort_tasks(&mut tasks);
        tasks.truncate(MAX_TASKS);
        info!("Loaded {} tasks from {}", tasks.len(), self.dir.display());
        Ok(tasks)
    }
}

fn is_task_file(path: &Path) -> bool {
    let is_json = path.extension().map_or(false, |ext| ext == "json");
    let corrupted = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with(CORRUPTED_PREFIX));
    is_json && !corrupted
}

async fn load_file(path: &Path) -> Result<Task, TaskSourceError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| TaskSourceError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(TaskSourceError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
        });
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| TaskSourceError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file: TaskFile = serde_json::from_slice(&bytes).map_err(|source| TaskSourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.into_task())
}

/// Sort by priority weight, then by creation time with the newest first.
/// Tasks without a creation time go last within their priority.
///
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (Reverse(t.priority.weight()), Reverse(t.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nope"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loads_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{"id": "a", "title": "low", "priority": "low"}"#);
        write(
            &dir,
            "b.json",
            r#"{"id": "b", "title": "old critical", "priority": "critical", "createdAt": "2024-01-01T00:00:00Z"}"#,
        );
        write(
            &dir,
            "c.json",
            r#"{"id": "c", "title": "new critical", "priority": "critical", "createdAt": "2024-06-01T00:00:00Z"}"#,
        );
        write(&dir, "notes.txt", "not a task");

        let tasks = TaskStore::new(dir.path()).load_all().await.unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_skips_corrupted_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.json", r#"{"id": "good"}"#);
        write(&dir, "corrupted-1.json", r#"{"id": "bad"}"#);
        write(&dir, "broken.json", "{ not json");
        write(&dir, "big.json", &format!(r#"{{"id": "big", "description": "{}"}}"#, "x".repeat(2 * 1024 * 1024)));

        let tasks = TaskStore::new(dir.path()).load_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "good");
    }

    #[test]
    fn test_sort_tasks_puts_undated_last() {
        let mut undated = Task::new("undated", "u");
        undated.priority = TaskPriority::High;
        let mut dated = Task::new("dated", "d");
        dated.priority = TaskPriority::High;
        dated.created_at = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let mut tasks = vec![undated, dated];
        sort_tasks(&mut tasks);
        assert_eq!(tasks[0].id, "dated");
    }
}
