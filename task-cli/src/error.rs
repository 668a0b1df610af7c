use std::path::PathBuf;

/// Failures surfaced by the task store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing file exists but does not hold a valid task list.
    #[error("Task file {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },
    /// The backing file could not be read or written.
    #[error("Cannot access task file {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The highest task ID is already `u32::MAX`, so no new ID can be allocated.
    #[error("No task IDs left: the highest ID in use is {0}")]
    IdsExhausted(u32),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code reported for this failure kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::TaskNotFound(_) => 3,
            Error::CorruptStore { .. } => 4,
            Error::Persistence { .. } => 5,
            Error::InvalidArgument(_) => 6,
            Error::IdsExhausted(_) => 7,
        }
    }
}
