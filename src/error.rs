//! error types
//!
//! structured errors for configuration, request building, transport,
//! and api responses.

use crate::config::ApiVersion;
use crate::graphql::GraphQlError;
use crate::response::{ApiErrorBody, StatusCode};
use crate::transport::TransportError;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("resource targets {resource}, client is configured for {rest} and {graphql}")]
    IncompatibleVersion {
        /// version declared by the resource
        resource: ApiVersion,
        /// configured rest version
        rest: ApiVersion,
        /// configured graphql version
        graphql: ApiVersion,
    },

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("unrecognized http status: {0}")]
    IncompatibleResponse(u16),

    #[error("api error: {status}")]
    Api {
        /// classified status code
        status: StatusCode,
        /// decoded server error payload, when the body matched
        body: Option<ApiErrorBody>,
    },

    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("graphql error: {message}")]
    GraphQl {
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// top-level message
        message: String,
    },

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::Api {
                status: StatusCode::Unauthorized | StatusCode::Forbidden,
                ..
            }
        )
    }

    /// true if the server asked the caller to slow down
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Error::Api {
                status: StatusCode::TooManyRequests,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        let err = Error::Api {
            status: StatusCode::Unauthorized,
            body: None,
        };
        assert!(err.is_auth_error());

        let err = Error::Api {
            status: StatusCode::Forbidden,
            body: None,
        };
        assert!(err.is_auth_error());

        let err = Error::Api {
            status: StatusCode::InternalServerError,
            body: None,
        };
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_is_rate_limited() {
        let err = Error::Api {
            status: StatusCode::TooManyRequests,
            body: None,
        };
        assert!(err.is_rate_limited());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_incompatible_version_display() {
        let err = Error::IncompatibleVersion {
            resource: ApiVersion::Rest(1),
            rest: ApiVersion::Rest(2),
            graphql: ApiVersion::GraphQl(1),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("rest v1"));
        assert!(rendered.contains("rest v2"));
        assert!(rendered.contains("graphql v1"));
    }
}
