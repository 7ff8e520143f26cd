//! client configuration
//!
//! build a [`Configuration`] with api endpoints, token, and optional
//! overrides. pass it to [`crate::Client::new`] to create a client.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_REST_BASE: &str = "https://api.buildkite.com";
const DEFAULT_GRAPHQL_BASE: &str = "https://graphql.buildkite.com";

/// api version tag declared by every resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// rest api version, e.g. `Rest(2)` for v2
    Rest(u8),
    /// graphql api version, e.g. `GraphQl(1)` for v1
    GraphQl(u8),
}

impl ApiVersion {
    /// url path segment for this version ("v2", "v1", ...)
    pub fn segment(&self) -> String {
        match self {
            ApiVersion::Rest(v) | ApiVersion::GraphQl(v) => format!("v{v}"),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Rest(v) => write!(f, "rest v{v}"),
            ApiVersion::GraphQl(v) => write!(f, "graphql v{v}"),
        }
    }
}

/// bearer token lookup keyed by api version
pub trait TokenProvider: Send + Sync {
    /// token for the given api version, or `None` to send the request
    /// unauthenticated
    fn token(&self, version: ApiVersion) -> Option<String>;
}

/// fixed token used for every api version
struct FixedToken(String);

impl TokenProvider for FixedToken {
    fn token(&self, _version: ApiVersion) -> Option<String> {
        Some(self.0.clone())
    }
}

/// one configured api endpoint: a version and the base url it lives at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub(crate) version: ApiVersion,
    pub(crate) base_url: Url,
    pub(crate) base_url_valid: bool,
    raw_base_url: String,
}

impl ApiEndpoint {
    /// create an endpoint from a version and base url (with or without
    /// trailing slash; a missing scheme defaults to https)
    pub fn new(version: ApiVersion, base_url: impl AsRef<str>) -> Self {
        let raw = base_url.as_ref();
        let normalized = raw.trim_end_matches('/');

        let (base_url, base_url_valid) = match Url::parse(normalized)
            .or_else(|_| Url::parse(&format!("https://{}", normalized)))
        {
            Ok(url) => (url, true),
            Err(_) => (Url::parse("https://invalid.invalid").unwrap(), false),
        };

        Self {
            version,
            base_url,
            base_url_valid,
            raw_base_url: raw.to_string(),
        }
    }

    /// version declared by this endpoint
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// versioned url for a resource path; an empty path targets the
    /// versioned base itself
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let url_str = if path.is_empty() {
            format!("{}/{}", base, self.version.segment())
        } else {
            format!("{}/{}/{}", base, self.version.segment(), path)
        };
        Url::parse(&url_str).map_err(Error::from)
    }

    fn validate(&self) -> Result<()> {
        if !self.base_url_valid {
            return Err(Error::Config(format!(
                "invalid base url: {}",
                self.raw_base_url
            )));
        }

        if self.base_url.scheme() != "http" && self.base_url.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.base_url.scheme()
            )));
        }

        Ok(())
    }
}

/// configuration for the buildkite client
#[derive(Clone)]
pub struct Configuration {
    /// rest api endpoint
    pub(crate) rest: ApiEndpoint,

    /// graphql api endpoint
    pub(crate) graphql: ApiEndpoint,

    /// bearer token source, if any
    pub(crate) token: Option<Arc<dyn TokenProvider>>,

    /// user agent string
    pub(crate) user_agent: String,

    /// request timeout used by the default transport
    pub(crate) timeout: Duration,
}

impl Configuration {
    /// create a configuration pointing at the hosted buildkite endpoints,
    /// with no token
    ///
    /// # example
    ///
    /// ```
    /// use buildkite::Configuration;
    ///
    /// let config = Configuration::new().with_token("your-token-here");
    /// ```
    pub fn new() -> Self {
        Self {
            rest: ApiEndpoint::new(ApiVersion::Rest(2), DEFAULT_REST_BASE),
            graphql: ApiEndpoint::new(ApiVersion::GraphQl(1), DEFAULT_GRAPHQL_BASE),
            token: None,
            user_agent: format!("buildkite-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }

    /// set a fixed bearer token used for every api version
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Arc::new(FixedToken(token.into())));
        self
    }

    /// set a token provider resolving tokens per api version
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token = Some(Arc::new(provider));
        self
    }

    /// replace the rest endpoint (e.g. to point at a proxy)
    pub fn with_rest_endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.rest = endpoint;
        self
    }

    /// replace the graphql endpoint
    pub fn with_graphql_endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.graphql = endpoint;
        self
    }

    /// set the request timeout used by the default transport
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// swap the fixed bearer token in place
    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(Arc::new(FixedToken(token)));
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        self.rest.validate()?;
        self.graphql.validate()?;
        Ok(())
    }

    /// endpoint matching a resource's declared version, if configured
    pub(crate) fn endpoint_for(&self, version: ApiVersion) -> Option<&ApiEndpoint> {
        if self.rest.version == version {
            Some(&self.rest)
        } else if self.graphql.version == version {
            Some(&self.graphql)
        } else {
            None
        }
    }

    /// bearer token for an api version, if one is configured
    pub(crate) fn token_for(&self, version: ApiVersion) -> Option<String> {
        self.token.as_ref().and_then(|provider| provider.token(version))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("rest", &self.rest.base_url)
            .field("graphql", &self.graphql.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
