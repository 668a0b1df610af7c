use crate::error::{Error, Result};
use crate::storage::{JsonFileStorage, TaskStorage};
use crate::task::{Status, Task};

/// The ordered task collection and the only way to mutate it.
///
/// Every mutation is computed on a copy and persisted before it replaces the
/// in-memory list, so a failed save leaves the repository as it was.
///
/// Concurrent runs against the same file are not isolated: each one loads at
/// start-up and overwrites at the end, so the last write wins.
#[derive(Debug)]
pub struct TaskRepository<S: TaskStorage = JsonFileStorage> {
    storage: S,
    tasks: Vec<Task>,
}

impl<S: TaskStorage> TaskRepository<S> {
    /// Loads the current task list from `storage`.
    pub fn open(storage: S) -> Result<Self> {
        let tasks = storage.load()?;
        Ok(Self { storage, tasks })
    }

    /// Writes the full task list back to storage.
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.tasks)
    }

    /// Returns `1` for an empty store, otherwise one past the highest ID.
    ///
    /// Deleting the task holding the highest ID makes that ID available again.
    /// Fails with [`Error::IdsExhausted`] once the highest ID is `u32::MAX`.
    pub fn generate_id(&self) -> Result<u32> {
        match self.tasks.iter().map(Task::id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(Error::IdsExhausted(max)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, description: &str) -> Result<Task> {
        let description = require_description(description)?;
        let task = Task::new(self.generate_id()?, description);

        let mut tasks = self.tasks.clone();
        tasks.push(task.clone());
        self.commit(tasks)?;

        tracing::info!(id = task.id(), "Task added");
        Ok(task)
    }

    /// Tasks in store order, optionally restricted to one status.
    pub fn list(&self, status: Option<Status>) -> impl Iterator<Item = &Task> + '_ {
        self.tasks
            .iter()
            .filter(move |task| status.is_none_or(|status| task.status() == status))
    }

    /// Changes the description and/or status of a task.
    ///
    /// At least one change must be supplied and a supplied description must
    /// not be blank; otherwise nothing is touched, not even `updated_at`.
    #[tracing::instrument(skip(self))]
    pub fn update(
        &mut self,
        id: u32,
        description: Option<&str>,
        status: Option<Status>,
    ) -> Result<Task> {
        if description.is_none() && status.is_none() {
            return Err(Error::InvalidArgument(
                "at least a description or a status is required to update a task".to_string(),
            ));
        }
        let description = description.map(require_description).transpose()?;
        let index = self.position(id)?;

        let mut tasks = self.tasks.clone();
        tasks[index].update(description, status);
        let updated = tasks[index].clone();
        self.commit(tasks)?;

        tracing::info!(id, "Task updated");
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: u32) -> Result<Task> {
        let index = self.position(id)?;

        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(index);
        self.commit(tasks)?;

        tracing::info!(id, "Task deleted");
        Ok(removed)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: u32) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| {
                tracing::warn!(id, "Task not found");
                Error::TaskNotFound(id)
            })
    }

    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.storage.save(&tasks)?;
        self.tasks = tasks;
        Ok(())
    }
}

fn require_description(description: &str) -> Result<&str> {
    if description.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "description must not be empty".to_string(),
        ));
    }
    Ok(description)
}
