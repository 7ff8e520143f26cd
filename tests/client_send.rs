use async_trait::async_trait;
use buildkite::resources::{GetUser, ListBuilds, StopAgent};
use buildkite::{
    Client, Configuration, Error, Follow, PageOptions, Transport, TransportError,
    TransportOutput, TransportRequest,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, LINK, USER_AGENT};
use std::sync::{Arc, Mutex};

/// scripted transport recording every request it sees
struct ScriptedTransport {
    status: u16,
    headers: HeaderMap,
    body: String,
    seen: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    fn returning(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn with_link(mut self, value: &'static str) -> Self {
        self.headers.insert(LINK, HeaderValue::from_static(value));
        self
    }

    fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportOutput, TransportError> {
        self.seen.lock().unwrap().push(request);
        Ok(TransportOutput {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone().into_bytes(),
        })
    }
}

fn client_with(transport: Arc<ScriptedTransport>) -> Client {
    Client::with_transport(Configuration::new().with_token("abc"), transport).unwrap()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn sends_get_user_end_to_end() {
    let transport = Arc::new(ScriptedTransport::returning(
        200,
        "{\"id\":\"u1\",\"name\":\"Jeff\",\"email\":\"jeff@example.com\",\
         \"created_at\":\"2022-01-13T12:13:57Z\"}",
    ));
    let client = client_with(transport.clone());

    let response = client.send(&GetUser).await.unwrap();
    assert_eq!(response.content.name, "Jeff");
    assert!(response.page.is_none());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.as_str(), "https://api.buildkite.com/v2/user");
    assert_eq!(requests[0].headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    assert!(requests[0].headers.get(USER_AGENT).is_some());
    assert!(requests[0].body.is_none());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn paginates_builds_and_reads_link_header() {
    let transport = Arc::new(
        ScriptedTransport::returning(200, "[]").with_link(
            "<https://api.buildkite.com/v2/organizations/acme/pipelines/deploy/builds?page=2>; \
             rel=\"next\", \
             <https://api.buildkite.com/v2/organizations/acme/pipelines/deploy/builds?page=5>; \
             rel=\"last\"",
        ),
    );
    let client = client_with(transport.clone());

    let builds = ListBuilds {
        org: "acme".to_string(),
        pipeline: "deploy".to_string(),
    };
    let response = client
        .send_paginated(&builds, PageOptions::new(1, 30))
        .await
        .unwrap();

    let page = response.page.unwrap();
    assert_eq!(page.next, Some(2));
    assert_eq!(page.last, Some(5));

    let requests = transport.requests();
    let query = requests[0].url.query().unwrap();
    assert!(query.contains("page=1"));
    assert!(query.contains("per_page=30"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn stop_agent_sends_body_and_ignores_response() {
    let transport = Arc::new(ScriptedTransport::returning(200, "irrelevant"));
    let client = client_with(transport.clone());

    let stop = StopAgent {
        org: "acme".to_string(),
        agent: "agent-1".to_string(),
        force: false,
    };
    client.send(&stop).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, reqwest::Method::PUT);
    assert_eq!(
        requests[0].headers.get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: serde_json::Value =
        serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
    assert_eq!(body["force"], false);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn follow_requests_the_captured_url() {
    let transport = Arc::new(ScriptedTransport::returning(
        200,
        "{\"id\":\"u1\",\"name\":\"Jeff\",\"email\":\"jeff@example.com\",\
         \"created_at\":\"2022-01-13T12:13:57Z\"}",
    ));
    let client = client_with(transport.clone());

    let url = url::Url::parse("https://artifacts.example.com/abc123?sig=xyz").unwrap();
    let follow = Follow::new(url.clone(), GetUser);
    client.send(&follow).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url.as_str(), url.as_str());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn surfaces_structured_api_error() {
    let transport = Arc::new(ScriptedTransport::returning(
        422,
        "{\"message\": \"Validation failed\", \"errors\": [\"commit is required\"]}",
    ));
    let client = client_with(transport);

    let err = client.send(&GetUser).await.unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status.as_u16(), 422);
            let body = body.unwrap();
            assert_eq!(body.message, "Validation failed");
            assert_eq!(body.errors, vec!["commit is required".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn unrecognized_status_is_incompatible() {
    let transport = Arc::new(ScriptedTransport::returning(599, ""));
    let client = client_with(transport);

    let err = client.send(&GetUser).await.unwrap_err();
    assert!(matches!(err, Error::IncompatibleResponse(599)));
}
