use clap::Parser;
use std::process::ExitCode;
use task_cli::cli::{self, Cli};
use task_cli::config::Config;
use task_cli::{JsonFileStorage, TaskRepository};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config.with_file_override(args.file),
        Err(err) => {
            eprintln!("Error: invalid configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let (filter, rejected_filter) = match EnvFilter::try_new(&config.log) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("warn"), Some(err)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Some(err) = rejected_filter {
        tracing::warn!(
            "Ignoring invalid log filter '{}', using 'warn': {}",
            config.log,
            err
        );
    }
    tracing::debug!(file = %config.file.display(), "Using task file");

    let result = TaskRepository::open(JsonFileStorage::new(config.file))
        .and_then(|mut repo| cli::run(args.command, &mut repo, &mut std::io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
