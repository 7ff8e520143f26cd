//! buildkite api client
//!
//! this crate provides a small, typed client for the buildkite rest and
//! graphql apis, plus verification of inbound webhook deliveries. start
//! with [`Client`] and [`Configuration`], then `send` any [`Resource`]
//! value or `query` a [`GraphQl`] request.
//!
//! ## quick start
//!
//! ```no_run
//! use buildkite::{Client, Configuration};
//! use buildkite::resources::GetUser;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Configuration::new().with_token("token"))?;
//! let response = client.send(&GetUser).await?;
//! println!("{}", response.content.name);
//! # Ok(())
//! # }
//! ```
//!
//! ## pagination
//!
//! paginated resources accept explicit page options, and [`Paginator`]
//! walks `next` cursors for you:
//!
//! ```no_run
//! use buildkite::{Client, Configuration, PageOptions, Paginator};
//! use buildkite::resources::ListBuilds;
//!
//! # async fn example(client: Client) -> Result<(), Box<dyn std::error::Error>> {
//! let builds = ListBuilds {
//!     org: "acme".to_string(),
//!     pipeline: "deploy".to_string(),
//! };
//! let all = Paginator::new(PageOptions::default(), |page| {
//!     client.send_paginated(&builds, page)
//! })
//! .collect_all()
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## webhooks
//!
//! ```
//! use buildkite::events::decode_webhook;
//! use buildkite::webhook::WebhookVerifier;
//!
//! # fn example(header: &str, body: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = WebhookVerifier::new("secret").with_replay_limit(300);
//! verifier.verify_signature(header, body)?;
//! let event = decode_webhook(body)?;
//! println!("{}", event.event());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod graphql;
mod pagination;
mod request;
mod resource;
mod response;
mod transport;

pub mod events;
pub mod models;
pub mod resources;
pub mod webhook;

pub use client::Client;
pub use config::{ApiEndpoint, ApiVersion, Configuration, TokenProvider};
pub use error::{Error, Result};
pub use graphql::{GraphQl, GraphQlContent, GraphQlError, GraphQlLocation};
pub use pagination::{Page, PageOptions, Paginator};
pub use resource::{Follow, Resource};
pub use response::{ApiErrorBody, Response, StatusCode};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportOutput, TransportRequest,
};
