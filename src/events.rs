//! webhook events
//!
//! typed webhook payloads and the two-phase decode that picks a variant:
//! the body is decoded to a json tree first, the `event` field is read,
//! and the matching variant is then decoded from that tree.

use crate::error::{Error, Result};
use crate::models::{Agent, Build, Job, Organization, Pipeline};
use serde::{Deserialize, Serialize};

/// webhook delivery payload, discriminated by the `event` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookEvent {
    /// `ping`, sent when a webhook is created or tested
    Ping(PingEvent),
    /// `build.*` lifecycle notifications
    Build(BuildEvent),
    /// `job.*` lifecycle notifications
    Job(JobEvent),
    /// `agent.*` lifecycle notifications
    Agent(AgentEvent),
}

impl WebhookEvent {
    /// full event name, e.g. `build.finished`
    pub fn event(&self) -> &str {
        match self {
            WebhookEvent::Ping(event) => &event.event,
            WebhookEvent::Build(event) => &event.event,
            WebhookEvent::Job(event) => &event.event,
            WebhookEvent::Agent(event) => &event.event,
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        use serde::de::Error as _;

        let event = value
            .get("event")
            .and_then(|event| event.as_str())
            .ok_or_else(|| {
                Error::Decode(serde_json::Error::custom(
                    "webhook payload has no event field",
                ))
            })?
            .to_owned();

        let family = event.split('.').next().unwrap_or(&event).to_owned();
        match family.as_str() {
            "ping" => serde_json::from_value(value)
                .map(WebhookEvent::Ping)
                .map_err(Error::Decode),
            "build" => serde_json::from_value(value)
                .map(WebhookEvent::Build)
                .map_err(Error::Decode),
            "job" => serde_json::from_value(value)
                .map(WebhookEvent::Job)
                .map_err(Error::Decode),
            "agent" => serde_json::from_value(value)
                .map(WebhookEvent::Agent)
                .map_err(Error::Decode),
            other => Err(Error::Decode(serde_json::Error::custom(format!(
                "unknown webhook event: {other}"
            )))),
        }
    }
}

impl<'de> Deserialize<'de> for WebhookEvent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        WebhookEvent::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// decode a webhook request body into a typed event
pub fn decode_webhook(body: &[u8]) -> Result<WebhookEvent> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(Error::Decode)?;
    WebhookEvent::from_value(value)
}

/// who triggered the delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub name: String,
}

/// `ping` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingEvent {
    pub event: String,
    pub organization: Organization,
    #[serde(default)]
    pub sender: Option<Sender>,
}

/// `build.*` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildEvent {
    pub event: String,
    pub build: Build,
    pub pipeline: Pipeline,
    #[serde(default)]
    pub sender: Option<Sender>,
}

/// `job.*` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    pub event: String,
    pub job: Job,
    pub build: Build,
    pub pipeline: Pipeline,
    #[serde(default)]
    pub sender: Option<Sender>,
}

/// `agent.*` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub event: String,
    pub agent: Agent,
    #[serde(default)]
    pub sender: Option<Sender>,
}
