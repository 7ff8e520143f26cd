//! resource contract
//!
//! a resource describes one api operation: which api it targets, how the
//! request is shaped, and what a successful response decodes to. concrete
//! resources are plain values consumed once per call.

use crate::config::ApiVersion;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

/// typed description of one api operation
pub trait Resource {
    /// decoded payload of a successful response; `()` when the body is
    /// ignored
    type Content: DeserializeOwned;

    /// api version this resource targets
    fn api_version(&self) -> ApiVersion;

    /// slash-joined path below the versioned base url; an empty path
    /// targets the versioned base itself
    fn path(&self) -> String;

    /// http method, GET unless overridden
    fn method(&self) -> Method {
        Method::GET
    }

    /// serialized request body, if this operation carries one
    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    /// whether responses are pageable collections
    fn paginated(&self) -> bool {
        false
    }

    /// absolute url replacing path assembly entirely (set by [`Follow`])
    fn url_override(&self) -> Option<Url> {
        None
    }

    /// decode a successful response body into [`Self::Content`]
    ///
    /// resources with `()` content override this to skip the body.
    fn decode_content(&self, body: &[u8]) -> Result<Self::Content> {
        serde_json::from_slice(body).map_err(Error::Decode)
    }
}

/// resource wrapper pinning the request url to one captured from a prior
/// response (e.g. an artifact `download_url`)
#[derive(Debug, Clone)]
pub struct Follow<R> {
    url: Url,
    resource: R,
}

impl<R> Follow<R> {
    /// send `resource` to `url` instead of its templated path
    pub fn new(url: Url, resource: R) -> Self {
        Self { url, resource }
    }
}

impl<R: Resource> Resource for Follow<R> {
    type Content = R::Content;

    fn api_version(&self) -> ApiVersion {
        self.resource.api_version()
    }

    fn path(&self) -> String {
        String::new()
    }

    fn method(&self) -> Method {
        self.resource.method()
    }

    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        self.resource.request_body()
    }

    fn paginated(&self) -> bool {
        self.resource.paginated()
    }

    fn url_override(&self) -> Option<Url> {
        Some(self.url.clone())
    }

    fn decode_content(&self, body: &[u8]) -> Result<Self::Content> {
        self.resource.decode_content(body)
    }
}
