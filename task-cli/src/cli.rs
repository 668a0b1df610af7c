use crate::error::Result;
use crate::repository::TaskRepository;
use crate::storage::TaskStorage;
use crate::task::Status;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Track tasks in a local JSON file.
#[derive(Parser, Debug)]
#[command(name = "task-cli", version)]
pub struct Cli {
    /// Task file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create one task per description
    Add {
        #[arg(required = true, value_parser = NonEmptyStringValueParser::new())]
        descriptions: Vec<String>,
    },
    /// Show tasks, optionally only those with the given status
    List {
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
    /// Change the description and/or status of a task
    Update {
        id: u32,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        description: Option<String>,
        #[arg(long, value_enum, required_unless_present = "description")]
        status: Option<Status>,
    },
    /// Remove a task
    Delete { id: u32 },
}

/// Runs one command against `repo`, writing the user-facing output to `out`.
pub fn run<S: TaskStorage>(
    command: Commands,
    repo: &mut TaskRepository<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Add { descriptions } => {
            for description in descriptions {
                let task = repo.add(&description)?;
                write_line(
                    out,
                    format_args!(
                        "Task '{}' added successfully (ID: {}).",
                        task.description(),
                        task.id()
                    ),
                );
            }
        }
        Commands::List { status } => {
            let mut tasks = repo.list(status).peekable();
            if tasks.peek().is_none() {
                write_line(out, format_args!("No tasks to display."));
            }
            for task in tasks {
                write_line(out, format_args!("{task}"));
            }
        }
        Commands::Update {
            id,
            description,
            status,
        } => {
            repo.update(id, description.as_deref(), status)?;
            write_line(out, format_args!("Task '{id}' updated successfully."));
        }
        Commands::Delete { id } => {
            repo.delete(id)?;
            write_line(out, format_args!("Task '{id}' deleted successfully."));
        }
    }
    Ok(())
}

fn write_line(out: &mut impl Write, line: std::fmt::Arguments<'_>) {
    // a closed stdout is not a store failure
    if let Err(err) = writeln!(out, "{line}") {
        tracing::warn!("Failed to write output: {}", err);
    }
}
