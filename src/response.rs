//! response interpretation
//!
//! maps raw transport output onto typed responses: status classification
//! against the closed code set, server error unwrapping, link-header
//! pagination, and content decoding.

use crate::error::{Error, Result};
use crate::pagination::Page;
use crate::resource::Resource;
use crate::transport::TransportOutput;
use reqwest::header::{HeaderMap, LINK};
use serde::Deserialize;
use std::fmt;

/// recognized http status codes
///
/// anything outside this set is surfaced as
/// [`Error::IncompatibleResponse`] rather than a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    Accepted,
    Found,
    SeeOther,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
}

impl StatusCode {
    /// map a raw status integer onto the closed set
    pub fn from_u16(raw: u16) -> Option<Self> {
        match raw {
            200 => Some(StatusCode::Ok),
            201 => Some(StatusCode::Created),
            202 => Some(StatusCode::Accepted),
            302 => Some(StatusCode::Found),
            303 => Some(StatusCode::SeeOther),
            400 => Some(StatusCode::BadRequest),
            401 => Some(StatusCode::Unauthorized),
            403 => Some(StatusCode::Forbidden),
            404 => Some(StatusCode::NotFound),
            422 => Some(StatusCode::UnprocessableEntity),
            429 => Some(StatusCode::TooManyRequests),
            500 => Some(StatusCode::InternalServerError),
            _ => None,
        }
    }

    /// raw status integer
    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::Accepted => 202,
            StatusCode::Found => 302,
            StatusCode::SeeOther => 303,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::UnprocessableEntity => 422,
            StatusCode::TooManyRequests => 429,
            StatusCode::InternalServerError => 500,
        }
    }

    /// whether this code counts as success
    ///
    /// 302 is included for redirect-style download endpoints; 303 is
    /// recognized but deliberately not treated as success.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            StatusCode::Ok | StatusCode::Created | StatusCode::Accepted | StatusCode::Found
        )
    }

    fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::Found => "Found",
            StatusCode::SeeOther => "See Other",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::UnprocessableEntity => "Unprocessable Entity",
            StatusCode::TooManyRequests => "Too Many Requests",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// server-supplied error payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    /// top-level message
    pub message: String,
    /// detail strings
    #[serde(default)]
    pub errors: Vec<String>,
}

/// typed successful response
#[derive(Debug, Clone)]
pub struct Response<C> {
    /// decoded payload
    pub content: C,
    /// classified status code
    pub status: StatusCode,
    /// raw response headers
    pub headers: HeaderMap,
    /// pagination cursors, when the server sent a `Link` header
    pub page: Option<Page>,
}

/// interpret transport output against a resource's declared content
pub(crate) fn interpret<R: Resource + ?Sized>(
    resource: &R,
    output: TransportOutput,
) -> Result<Response<R::Content>> {
    let status = StatusCode::from_u16(output.status)
        .ok_or(Error::IncompatibleResponse(output.status))?;

    if !status.is_success() {
        let body = serde_json::from_slice::<ApiErrorBody>(&output.body).ok();
        return Err(Error::Api { status, body });
    }

    let page = output
        .headers
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(Page::from_link_header);

    let content = resource.decode_content(&output.body)?;

    Ok(Response {
        content,
        status,
        headers: output.headers,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;
    use reqwest::header::HeaderValue;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    struct GetPerson;

    impl Resource for GetPerson {
        type Content = Person;

        fn api_version(&self) -> ApiVersion {
            ApiVersion::Rest(2)
        }

        fn path(&self) -> String {
            "people/1".to_string()
        }
    }

    struct Ping;

    impl Resource for Ping {
        type Content = ();

        fn api_version(&self) -> ApiVersion {
            ApiVersion::Rest(2)
        }

        fn path(&self) -> String {
            "ping".to_string()
        }

        fn decode_content(&self, _body: &[u8]) -> crate::error::Result<Self::Content> {
            Ok(())
        }
    }

    fn output(status: u16, body: &str) -> TransportOutput {
        TransportOutput {
            status,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_status_classification() {
        for raw in [200, 201, 202, 302] {
            assert!(StatusCode::from_u16(raw).unwrap().is_success(), "{raw}");
        }
        for raw in [303, 400, 401, 404, 422, 429, 500] {
            assert!(!StatusCode::from_u16(raw).unwrap().is_success(), "{raw}");
        }
        assert!(StatusCode::from_u16(599).is_none());
        assert_eq!(StatusCode::from_u16(422), Some(StatusCode::UnprocessableEntity));
        assert_eq!(StatusCode::UnprocessableEntity.as_u16(), 422);
    }

    #[test]
    fn test_interpret_success_decodes_content() {
        let response = interpret(&GetPerson, output(200, "{\"name\":\"Jeff\",\"age\":35}")).unwrap();
        assert_eq!(
            response.content,
            Person {
                name: "Jeff".to_string(),
                age: 35
            }
        );
        assert_eq!(response.status, StatusCode::Ok);
        assert!(response.page.is_none());
    }

    #[test]
    fn test_interpret_unrecognized_status() {
        let err = interpret(&GetPerson, output(599, "")).unwrap_err();
        assert!(matches!(err, Error::IncompatibleResponse(599)));
    }

    #[test]
    fn test_interpret_api_error_with_body() {
        let err = interpret(
            &GetPerson,
            output(422, "{\"message\": \"Validation failed\", \"errors\": [\"name is required\"]}"),
        )
        .unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, StatusCode::UnprocessableEntity);
                let body = body.unwrap();
                assert_eq!(body.message, "Validation failed");
                assert_eq!(body.errors, vec!["name is required".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_api_error_bare_status() {
        let err = interpret(&GetPerson, output(500, "<html>oops</html>")).unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, StatusCode::InternalServerError);
                assert!(body.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_decode_failure() {
        let err = interpret(&GetPerson, output(200, "{\"name\": 12}")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_interpret_void_content_ignores_body() {
        let response = interpret(&Ping, output(200, "<html>not json</html>")).unwrap();
        let () = response.content;
        assert_eq!(response.status, StatusCode::Ok);
    }

    #[test]
    fn test_interpret_attaches_page() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://api.buildkite.com/v2/builds?page=2>; rel=\"next\"",
            ),
        );
        let out = TransportOutput {
            status: 200,
            headers,
            body: b"{\"name\":\"Jeff\",\"age\":35}".to_vec(),
        };
        let response = interpret(&GetPerson, out).unwrap();
        assert_eq!(response.page.unwrap().next, Some(2));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(
            StatusCode::UnprocessableEntity.to_string(),
            "422 Unprocessable Entity"
        );
    }
}
