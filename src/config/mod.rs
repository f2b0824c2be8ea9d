//! Configuration management module.
//!
//! This module handles loading and saving the YAML configuration file: the
//! theme, the tasks directory, the key sequence timeout and list display
//! options.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::input::timer::DEFAULT_TIMEOUT;
use crate::ui::theme::DEFAULT_THEME;
use crate::ui::views::ListOptions;
use log::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/taskdeck";
const DEFAULT_TASKS_PATH: &str = ".critical-claude/tasks";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub theme_name: String,
    pub tasks_dir: PathBuf,
    pub command_timeout_ms: u64,
    pub list: ListOptions,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default)]
    pub tasks_dir: Option<PathBuf>,
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    #[serde(default)]
    pub list: ListOptions,
}

fn default_theme_name() -> String {
    DEFAULT_THEME.to_string()
}

fn default_command_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            theme_name: default_theme_name(),
            tasks_dir: default_tasks_dir(),
            command_timeout_ms: default_command_timeout_ms(),
            list: ListOptions::default(),
            file_path: None,
        }
    }

    /// Return the path of the loaded configuration file, if any.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Return the multi-key sequence timeout.
    ///
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. If no file exists yet, write one holding the
    /// current values.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        // Specify config file path
        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.clone().ok_or(ConfigError::FilePathNotSet)?;

        if !file_path.exists() {
            info!("Creating configuration file {}", file_path.display());
            return self.save();
        }

        let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
            path: file_path.clone(),
            message: format!("IO error: {}", e),
        })?;
        self.apply(&contents)?;
        debug!("Loaded configuration from {}", file_path.display());
        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            theme_name: self.theme_name.clone(),
            tasks_dir: Some(self.tasks_dir.clone()),
            command_timeout_ms: self.command_timeout_ms,
            list: self.list,
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Overwrite the current values with those parsed from YAML. Missing
    /// fields fall back to their defaults.
    ///
    fn apply(&mut self, contents: &str) -> Result<(), ConfigError> {
        let data: FileSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        self.theme_name = data.theme_name;
        self.tasks_dir = data
            .tasks_dir
            .map(|dir| expand_home(&dir))
            .unwrap_or_else(default_tasks_dir);
        self.command_timeout_ms = data.command_timeout_ms;
        self.list = data.list;
        Ok(())
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

/// Return the default tasks directory below the home directory.
///
fn default_tasks_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DEFAULT_TASKS_PATH),
        None => PathBuf::from(DEFAULT_TASKS_PATH),
    }
}

/// Expand a leading `~` to the home directory.
///
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.theme_name, "tokyo-night");
        assert_eq!(config.command_timeout(), Duration::from_millis(1000));
        assert!(config.tasks_dir.ends_with(".critical-claude/tasks"));
        assert!(config.list.show_priority);
        assert!(!config.list.show_line_numbers);
        assert!(config.file_path().is_none());
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested");
        let mut config = Config::new();
        config.load(path.to_str()).unwrap();
        let file = path.join(FILE_NAME);
        assert!(file.exists());
        assert_eq!(config.file_path(), Some(file.as_path()));

        let contents = fs::read_to_string(file).unwrap();
        assert!(contents.contains("theme_name: tokyo-night"));
        assert!(contents.contains("command_timeout_ms: 1000"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FILE_NAME),
            "theme_name: dracula\ntasks_dir: /srv/tasks\nlist:\n  show_line_numbers: true\n",
        )
        .unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        assert_eq!(config.theme_name, "dracula");
        assert_eq!(config.tasks_dir, PathBuf::from("/srv/tasks"));
        assert_eq!(config.command_timeout_ms, 1000);
        assert!(config.list.show_line_numbers);
        assert!(config.list.show_tags);
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.load(dir.path().to_str()).unwrap();
        config.command_timeout_ms = 250;
        config.list.wrap_text = true;
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.path().to_str()).unwrap();
        assert_eq!(reloaded.command_timeout_ms, 250);
        assert!(reloaded.list.wrap_text);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "command_timeout_ms: [not a number").unwrap();
        let mut config = Config::new();
        let error = config.load(dir.path().to_str()).unwrap_err();
        assert!(matches!(
            error,
            AppError::Config(ConfigError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn test_save_without_path_fails() {
        let error = Config::new().save().unwrap_err();
        assert!(matches!(error, AppError::Config(ConfigError::FilePathNotSet)));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/abs/dir")), PathBuf::from("/abs/dir"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/tasks")), home.join("tasks"));
        }
    }
}
