//! graphql support
//!
//! the graphql resource and the data-or-errors response envelope.

use crate::config::ApiVersion;
use crate::error::{Error, Result};
use crate::resource::Resource;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// graphql request executed against the configured graphql endpoint
///
/// always a POST with an empty path: the versioned graphql base url is
/// the full target.
#[derive(Debug, Clone)]
pub struct GraphQl<T> {
    query: String,
    variables: serde_json::Value,
    _content: PhantomData<fn() -> T>,
}

impl<T> GraphQl<T> {
    /// create a request for a query or mutation string
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: serde_json::Value::Object(serde_json::Map::new()),
            _content: PhantomData,
        }
    }

    /// attach a variables object
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = variables;
        self
    }
}

impl<T: DeserializeOwned> Resource for GraphQl<T> {
    type Content = GraphQlContent<T>;

    fn api_version(&self) -> ApiVersion {
        ApiVersion::GraphQl(1)
    }

    fn path(&self) -> String {
        String::new()
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        let body = serde_json::json!({
            "query": self.query,
            "variables": self.variables,
        });
        serde_json::to_vec(&body).map(Some).map_err(Error::Encode)
    }

    fn decode_content(&self, body: &[u8]) -> Result<Self::Content> {
        GraphQlContent::decode(body)
    }
}

/// graphql response envelope: data or errors, never both
///
/// a response carrying an `errors` key decodes to the errors variant even
/// when `data` is also present.
#[derive(Debug, Clone, Deserialize)]
pub enum GraphQlContent<T> {
    /// successful payload
    Data(T),
    /// server-reported errors
    Errors {
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// optional top-level error type tag
        type_name: Option<String>,
    },
}

impl<T: DeserializeOwned> GraphQlContent<T> {
    /// decode the envelope from raw response bytes
    ///
    /// decodes to a json tree first, then picks the variant: `errors`
    /// wins, then `data`, and a body with neither key is a decode error.
    pub(crate) fn decode(body: &[u8]) -> Result<Self> {
        use serde::de::Error as _;

        let value: serde_json::Value = serde_json::from_slice(body).map_err(Error::Decode)?;

        if let Some(errors) = value.get("errors") {
            let errors: Vec<GraphQlError> =
                serde_json::from_value(errors.clone()).map_err(Error::Decode)?;
            let type_name = value
                .get("type")
                .and_then(|tag| tag.as_str())
                .map(str::to_owned);
            return Ok(GraphQlContent::Errors { errors, type_name });
        }

        match value.get("data") {
            Some(data) => serde_json::from_value(data.clone())
                .map(GraphQlContent::Data)
                .map_err(Error::Decode),
            None => Err(Error::Decode(serde_json::Error::custom(
                "graphql response contains neither data nor errors",
            ))),
        }
    }
}

impl<T> GraphQlContent<T> {
    /// unwrap the data variant, raising the errors variant as
    /// [`Error::GraphQl`]
    pub fn get(self) -> Result<T> {
        match self {
            GraphQlContent::Data(data) => Ok(data),
            GraphQlContent::Errors { errors, .. } => {
                let message = errors
                    .first()
                    .map(|err| err.message.clone())
                    .unwrap_or_else(|| "graphql error".to_string());
                Err(Error::GraphQl { errors, message })
            }
        }
    }

    /// true if this is the errors variant
    pub fn has_errors(&self) -> bool {
        matches!(self, GraphQlContent::Errors { .. })
    }
}

/// graphql error entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    /// optional extensions payload
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// graphql error location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Viewer {
        id: String,
    }

    #[test]
    fn test_decode_data() {
        let content =
            GraphQlContent::<Viewer>::decode(b"{\"data\": {\"id\": \"abc\"}}").unwrap();
        match content {
            GraphQlContent::Data(viewer) => assert_eq!(viewer.id, "abc"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_decode_errors_wins_over_data() {
        let body = "{\"data\": {\"id\": \"abc\"}, \"errors\": [{\"message\": \"boom\"}]}";
        let content = GraphQlContent::<Viewer>::decode(body.as_bytes()).unwrap();
        assert!(content.has_errors());

        let err = content.get().unwrap_err();
        match err {
            Error::GraphQl { message, errors } => {
                assert_eq!(message, "boom");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_neither_key_fails() {
        let err = GraphQlContent::<Viewer>::decode(b"{\"ok\": true}").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_decode_error_locations_and_type() {
        let body = "{\"type\": \"user_error\", \"errors\": [{\"message\": \"bad field\", \
                    \"locations\": [{\"line\": 2, \"column\": 7}], \"path\": [\"viewer\"]}]}";
        let content = GraphQlContent::<Viewer>::decode(body.as_bytes()).unwrap();
        match content {
            GraphQlContent::Errors { errors, type_name } => {
                assert_eq!(type_name.as_deref(), Some("user_error"));
                assert_eq!(errors[0].locations[0].line, 2);
                assert_eq!(errors[0].locations[0].column, 7);
                assert_eq!(errors[0].path[0], "viewer");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_get_data() {
        let content = GraphQlContent::Data(Viewer {
            id: "abc".to_string(),
        });
        assert_eq!(
            content.get().unwrap(),
            Viewer {
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GraphQl::<Viewer>::new("query { viewer { id } }")
            .with_variables(serde_json::json!({"first": 10}));
        let body = request.request_body().unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["query"], "query { viewer { id } }");
        assert_eq!(value["variables"]["first"], 10);
    }

    #[test]
    fn test_resource_shape() {
        let request = GraphQl::<Viewer>::new("query { viewer { id } }");
        assert_eq!(request.api_version(), ApiVersion::GraphQl(1));
        assert_eq!(request.path(), "");
        assert_eq!(request.method(), Method::POST);
    }
}
