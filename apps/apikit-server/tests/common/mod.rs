#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Real-socket HTTP harness for end-to-end tests

use std::net::SocketAddr;
use std::sync::Arc;

use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Request as it was sent to the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

/// Application server bound to an ephemeral local port.
///
/// Every exchange is recorded; the latest one is available through
/// [`TestServer::last_request`] and [`TestServer::last_response`].
pub struct TestServer {
    addr: SocketAddr,
    client: Client<HttpConnector, Full<Bytes>>,
    handle: JoinHandle<()>,
    history: Mutex<Vec<(RecordedRequest, Arc<ResponseAsserter>)>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, apikit_server::build_router())
                .await
                .expect("Test server failed");
        });
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            addr,
            client,
            handle,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.history.lock().last().map(|(request, _)| request.clone())
    }

    pub fn last_response(&self) -> Option<Arc<ResponseAsserter>> {
        self.history.lock().last().map(|(_, response)| Arc::clone(response))
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    pub async fn get(&self, path: &str) -> Arc<ResponseAsserter> {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn delete(&self, path: &str) -> Arc<ResponseAsserter> {
        self.send(Method::DELETE, path, None, None).await
    }

    pub async fn post_json(&self, path: &str, body: &str) -> Arc<ResponseAsserter> {
        self.send(Method::POST, path, Some("application/json"), Some(body))
            .await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: Option<&str>,
        body: Option<&str>,
    ) -> Arc<ResponseAsserter> {
        let recorded = RecordedRequest {
            method: method.clone(),
            path: path.to_owned(),
            body: body.map(str::to_owned),
        };
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("http://{}{path}", self.addr));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let body = Full::new(Bytes::from(body.unwrap_or_default().to_owned()));
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .client
            .request(request)
            .await
            .expect("Request to test server failed");
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let response = Arc::new(ResponseAsserter {
            status,
            headers,
            body,
        });
        self.history.lock().push((recorded, Arc::clone(&response)));
        response
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Collected response with assertion helpers.
pub struct ResponseAsserter {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ResponseAsserter {
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "body is not JSON ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// Value at a dotted path such as `errors.nickname`; array items are addressed by index.
    pub fn property(&self, path: &str) -> Option<Value> {
        let body = self.json();
        let mut current = &body;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    pub fn assert_property_equals(&self, path: &str, expected: impl Into<Value>) -> &Self {
        let expected = expected.into();
        assert_eq!(
            self.property(path),
            Some(expected),
            "property '{path}' mismatch in {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    pub fn assert_property_exists(&self, path: &str) -> &Self {
        assert!(
            self.property(path).is_some(),
            "property '{path}' missing in {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    pub fn assert_property_missing(&self, path: &str) -> &Self {
        assert!(
            self.property(path).is_none(),
            "property '{path}' unexpectedly present in {}",
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Assert a problem+json body with the given status, title and type; returns the body.
    pub fn assert_problem(&self, status: StatusCode, title: &str, type_url: &str) -> Value {
        self.assert_status(status);
        assert_eq!(self.content_type(), "application/problem+json");
        let body = self.json();
        assert_eq!(body["status"], status.as_u16());
        assert_eq!(body["title"], title);
        assert_eq!(body["type"], type_url);
        body
    }
}
