//! transport boundary
//!
//! pluggable i/o seam between the client and the network. the default
//! [`ReqwestTransport`] performs real http calls; tests inject their own
//! implementation to observe requests and script responses.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// a materialized http request, ready to send
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// http method
    pub method: Method,
    /// absolute request url, query included
    pub url: Url,
    /// outbound headers
    pub headers: HeaderMap,
    /// encoded request body, if any
    pub body: Option<Vec<u8>>,
}

/// raw output of a transport call
#[derive(Debug, Clone)]
pub struct TransportOutput {
    /// raw http status
    pub status: u16,
    /// response headers
    pub headers: HeaderMap,
    /// response body bytes
    pub body: Vec<u8>,
}

/// transport-level failure, before any http status is available
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no response from server")]
    NoResponse,
}

/// pluggable request executor
#[async_trait]
pub trait Transport: Send + Sync {
    /// send a request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportOutput, TransportError>;
}

/// default transport backed by [`reqwest::Client`]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// build a transport with the given request timeout
    ///
    /// redirects are not followed: a 302 from a download endpoint must
    /// surface to the caller so the `Location` can be captured.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http })
    }

    /// wrap a preconfigured [`reqwest::Client`]
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportOutput, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(TransportOutput {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_request_is_cloneable() {
        let request = TransportRequest {
            method: Method::GET,
            url: Url::parse("https://api.buildkite.com/v2/user").unwrap(),
            headers: HeaderMap::new(),
            body: None,
        };
        let cloned = request.clone();
        assert_eq!(cloned.method, Method::GET);
        assert_eq!(cloned.url.as_str(), "https://api.buildkite.com/v2/user");
        assert!(cloned.body.is_none());
    }

    #[test]
    fn test_no_response_display() {
        let err = TransportError::NoResponse;
        assert_eq!(err.to_string(), "no response from server");
    }
}
