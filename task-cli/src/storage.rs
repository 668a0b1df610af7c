use crate::error::{Error, Result};
use crate::task::Task;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where the task list lives between runs.
#[cfg_attr(test, mockall::automock)]
pub trait TaskStorage {
    /// Reads the full ordered task list. A store that was never written is empty.
    fn load(&self) -> Result<Vec<Task>>;
    /// Replaces the stored task list with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Stores tasks as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> Error {
        Error::CorruptStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn persistence(&self, source: std::io::Error) -> Error {
        Error::Persistence {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn validate(&self, tasks: &[Task]) -> Result<()> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in tasks {
            if task.id() == 0 {
                return Err(self.corrupt("task IDs must be positive"));
            }
            if !seen.insert(task.id()) {
                return Err(self.corrupt(format!("duplicate task ID {}", task.id())));
            }
            if task.description().trim().is_empty() {
                return Err(
                    self.corrupt(format!("task {} has an empty description", task.id()))
                );
            }
            if task.created_at() > task.updated_at() {
                return Err(self.corrupt(format!(
                    "task {} was updated before it was created",
                    task.id()
                )));
            }
        }
        Ok(())
    }
}

/// Four-space indentation, matching files written by earlier versions.
fn to_pretty_json(tasks: &[Task]) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    tasks.serialize(&mut serializer)?;
    Ok(buffer)
}

impl TaskStorage for JsonFileStorage {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Task>> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Task file does not exist yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.persistence(err)),
        };

        let tasks: Vec<Task> =
            serde_json::from_slice(&contents).map_err(|err| self.corrupt(err.to_string()))?;
        self.validate(&tasks)?;
        tracing::debug!("Loaded {} tasks", tasks.len());
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, tasks), fields(path = %self.path.display(), count = tasks.len()))]
    fn save(&self, tasks: &[Task]) -> Result<()> {
        let bytes = to_pretty_json(tasks).map_err(|err| self.persistence(err.into()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.persistence(err))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, bytes).map_err(|err| self.persistence(err))?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.persistence(err));
        }
        tracing::debug!("Saved task file");
        Ok(())
    }
}
