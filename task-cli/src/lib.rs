pub mod cli;
pub mod config;
pub mod error;
pub mod repository;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
pub use repository::TaskRepository;
pub use storage::{JsonFileStorage, TaskStorage};
pub use task::{Status, Task};
