//! api payload models
//!
//! shared shapes for rest responses and webhook payloads. wire field
//! names are snake_case; timestamps are iso-8601 utc without fractional
//! seconds on the way out, tolerant of them on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// serde helpers for `DateTime<Utc>` fields
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// serde helpers for `Option<DateTime<Utc>>` fields
pub(crate) mod timestamp_opt {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// organization summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// pipeline summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub repository: String,
    #[serde(default)]
    pub branch_configuration: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// pipeline creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPipeline {
    pub name: String,
    pub repository: String,
    #[serde(default)]
    pub configuration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// build lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    Running,
    Scheduled,
    Passed,
    Failing,
    Failed,
    Blocked,
    Canceled,
    Canceling,
    Skipped,
    NotRun,
}

/// build summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub number: u64,
    pub state: BuildState,
    #[serde(default)]
    pub message: Option<String>,
    pub commit: String,
    pub branch: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default, with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_opt")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_opt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_opt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// build creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuild {
    pub commit: String,
    pub branch: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub env: Option<serde_json::Value>,
    #[serde(default)]
    pub meta_data: Option<serde_json::Value>,
}

/// job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Scheduled,
    Assigned,
    Running,
    Passed,
    Failed,
    Blocked,
    Canceled,
    Skipped,
    Broken,
}

/// job within a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    pub state: JobState,
    #[serde(default)]
    pub exit_status: Option<i32>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, with = "timestamp_opt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_opt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// agent connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentConnectionState {
    Connected,
    Disconnected,
    NeverConnected,
    Stopping,
    Stopped,
    Lost,
}

/// registered build agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub connection_state: AgentConnectionState,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// build artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub job_id: String,
    pub path: String,
    pub state: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub sha1sum: Option<String>,
}

/// build annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub context: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default, with = "timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}
