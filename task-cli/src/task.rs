use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A single trackable unit of work.
#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: u32,
    description: String,
    status: Status,
    #[serde(deserialize_with = "timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    updated_at: DateTime<Utc>,
}

/// Lifecycle label of a task. Any status may move to any other one.
#[derive(
    Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status '{0}', expected one of: todo, in-progress, done")]
pub struct UnknownStatus(String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Status::Todo),
            "in-progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl Task {
    /// Creates a `todo` task whose timestamps are both set to now.
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            description: description.into(),
            status: Status::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied changes in place and refreshes `updated_at`.
    ///
    /// An empty description is ignored. `updated_at` never moves backwards, so
    /// `created_at <= updated_at` holds even if the clock steps back.
    pub fn update(&mut self, description: Option<&str>, status: Option<Status>) {
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            self.description = description.to_string();
        }
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = Utc::now().max(self.updated_at).max(self.created_at);
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} - {} (Created: {}, Updated: {})",
            self.id,
            self.description,
            self.status,
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339()
        )
    }
}

/// Reading of the timestamp text found in task files.
///
/// Files written by this tool hold RFC 3339 instants. Older files carry
/// offset-less ISO-8601 text in local time, e.g. `2024-05-01T12:34:56.123456`.
pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, de};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(instant.with_timezone(&Utc));
        }
        let naive = raw.parse::<NaiveDateTime>()?;
        Ok(Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            // falls in a DST gap
            .unwrap_or_else(|| naive.and_utc()))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}
