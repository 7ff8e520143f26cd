//! request construction
//!
//! pure assembly of a transport request from a resource and the client
//! configuration. no i/o happens here; every failure is reported before
//! the network is touched.

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::pagination::PageOptions;
use crate::resource::Resource;
use crate::transport::TransportRequest;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

/// build a transport request for a resource
pub(crate) fn build<R: Resource + ?Sized>(
    resource: &R,
    config: &Configuration,
    page: Option<PageOptions>,
) -> Result<TransportRequest> {
    let version = resource.api_version();
    let endpoint = config
        .endpoint_for(version)
        .ok_or(Error::IncompatibleVersion {
            resource: version,
            rest: config.rest.version,
            graphql: config.graphql.version,
        })?;

    let mut url = match resource.url_override() {
        Some(url) => url,
        None => endpoint.url_for(&resource.path())?,
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|err| Error::Config(format!("invalid user agent header value: {err}")))?,
    );

    if let Some(token) = config.token_for(version) {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| Error::Config(format!("invalid api token header value: {err}")))?,
        );
    }

    let body = resource.request_body()?;
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if resource.paginated() {
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("page", &page.page.to_string())
                .append_pair("per_page", &page.per_page.to_string());
        }
    }

    Ok(TransportRequest {
        method: resource.method(),
        url,
        headers,
        body,
    })
}
