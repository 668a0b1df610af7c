use serde::Deserialize;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "task-cli";
pub const ENV_PREFIX: &str = "TASK_CLI";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Backing file holding the task list.
    #[serde(default = "default_file")]
    pub file: PathBuf,
    /// `tracing` filter directive, e.g. `warn` or `task_cli=debug`.
    #[serde(default = "default_log")]
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            log: default_log(),
        }
    }
}

impl Config {
    /// Loads `task-cli.toml` from the working directory if present, then
    /// `TASK_CLI_*` environment variables on top.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_sources(
            config::File::with_name(CONFIG_FILE_NAME).required(false),
            config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Later sources override earlier ones.
    pub fn from_sources<F, E>(file: F, env: E) -> anyhow::Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The `--file` flag wins over every other source.
    pub fn with_file_override(mut self, file: Option<PathBuf>) -> Self {
        if let Some(file) = file {
            self.file = file;
        }
        self
    }
}

fn default_file() -> PathBuf {
    PathBuf::from("tasks.json")
}

fn default_log() -> String {
    "warn".to_string()
}
