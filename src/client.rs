//! main client
//!
//! owns configuration and transport. every call funnels through one
//! dispatch path: build the request, send it, interpret the output.

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::graphql::GraphQl;
use crate::pagination::PageOptions;
use crate::request;
use crate::resource::Resource;
use crate::response::{self, Response};
use crate::transport::{ReqwestTransport, Transport};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// buildkite api client
///
/// cheap to clone; clones share the transport and snapshot the
/// configuration.
#[derive(Clone)]
pub struct Client {
    config: Configuration,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// create a client with the default reqwest-backed transport
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// create a client with an injected transport
    pub fn with_transport(config: Configuration, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// access the client configuration
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// replace the bearer token used by subsequent calls
    ///
    /// takes `&mut self`: callers sharing one client across tasks must
    /// synchronize token swaps themselves, typically by cloning a client
    /// per task and swapping before spawn.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.set_token(token.into());
    }

    /// send a resource and decode its response
    pub async fn send<R: Resource>(&self, resource: &R) -> Result<Response<R::Content>> {
        self.dispatch(resource, None).await
    }

    /// send a paginated resource with explicit page options
    pub async fn send_paginated<R: Resource>(
        &self,
        resource: &R,
        page: PageOptions,
    ) -> Result<Response<R::Content>> {
        self.dispatch(resource, Some(page)).await
    }

    /// execute a graphql request and unwrap its envelope
    ///
    /// the errors variant is raised as [`Error::GraphQl`]; use
    /// [`Client::send`] to inspect the envelope itself.
    pub async fn query<T: DeserializeOwned>(&self, request: &GraphQl<T>) -> Result<T> {
        let response = self.send(request).await?;
        response.content.get()
    }

    async fn dispatch<R: Resource + ?Sized>(
        &self,
        resource: &R,
        page: Option<PageOptions>,
    ) -> Result<Response<R::Content>> {
        let request = request::build(resource, &self.config, page)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        let output = self
            .transport
            .send(request)
            .await
            .map_err(Error::Transport)?;
        debug!(status = output.status, "received response");

        response::interpret(resource, output)
    }
}
