//! End-to-end dispatch against the live mock server.
//!
//! Starts the mock server on a random port and drives `ApiClient` over real
//! HTTP, once through `ReqwestTransport` and once through a blocking `ureq`
//! transport moved onto tokio's blocking pool.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use endpoint_core::{
    ApiClient, ApiError, EndpointDescriptor, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ParameterEncoding, ReqwestTransport, Transport, TransportError, UrlEncoding,
};
use mock_server::{Echo, Item};
use tokio::net::TcpListener;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

fn reqwest_client() -> ApiClient<ReqwestTransport> {
    ApiClient::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap())
}

fn endpoint(addr: SocketAddr, method: HttpMethod, path: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(format!("http://{addr}"), method, path)
}

/// Executes requests with ureq on the blocking pool.
///
/// Status codes are returned as data rather than `Err` so the core does the
/// interpretation.
struct UreqTransport;

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tokio::task::spawn_blocking(move || execute(request))
            .await
            .map_err(|e| TransportError::Other(Box::new(e)))?
    }
}

fn execute(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(req.timeout))
        .build()
        .new_agent();

    let url = req.url.as_str();
    let result = match req.method {
        HttpMethod::Get => with_headers(agent.get(url), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url), &req.headers).call(),
        HttpMethod::Post => send_body(with_headers(agent.post(url), &req.headers), req.body),
        HttpMethod::Put => send_body(with_headers(agent.put(url), &req.headers), req.body),
        HttpMethod::Patch => send_body(with_headers(agent.patch(url), &req.headers), req.body),
    };

    let mut response = match result {
        Ok(response) => response,
        Err(ureq::Error::Timeout(_)) => return Err(TransportError::Timeout),
        Err(ureq::Error::Io(e)) => return Err(TransportError::Connection(e.to_string())),
        Err(e) => return Err(TransportError::Other(Box::new(e))),
    };

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| TransportError::Other(Box::new(e)))?;

    Ok(HttpResponse {
        status: Some(status),
        headers: Vec::new(),
        body: Some(Bytes::from(body)),
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<Bytes>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(&body[..]),
        None => builder.send_empty(),
    }
}

// ---------------------------------------------------------------------------
// reqwest
// ---------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn decodes_item() {
    let addr = start_server().await;

    let item: Item = reqwest_client()
        .request_decodable(&endpoint(addr, HttpMethod::Get, "/items/7"))
        .await
        .unwrap();
    assert_eq!(item, Item { id: 7 });
}

#[tokio::test]
async fn not_found_carries_server_body() {
    let addr = start_server().await;

    let err = reqwest_client()
        .request_decodable::<Item, _>(&endpoint(addr, HttpMethod::Get, "/items/4040"))
        .await
        .unwrap_err();
    let ApiError::Http(http) = err else {
        panic!("expected HTTP error");
    };
    assert_eq!(http.kind, HttpErrorKind::NotFound);
    let body: serde_json::Value = serde_json::from_slice(http.data().unwrap()).unwrap();
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn statuses_are_classified() {
    let addr = start_server().await;
    let client = reqwest_client();

    for code in [400u16, 401, 403, 405, 409, 500, 502, 503] {
        let err = client
            .request_data(&endpoint(addr, HttpMethod::Get, &format!("/status/{code}")))
            .await
            .unwrap_err();
        assert_eq!(err.http_kind(), Some(HttpErrorKind::from_status(code)), "status {code}");
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let addr = start_server().await;

    let err = reqwest_client()
        .request_decodable::<Item, _>(&endpoint(addr, HttpMethod::Get, "/malformed"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn empty_success_body() {
    let addr = start_server().await;

    let body = reqwest_client()
        .request_data(&endpoint(addr, HttpMethod::Get, "/empty"))
        .await
        .unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn query_and_headers_reach_server() {
    let addr = start_server().await;
    let endpoint = endpoint(addr, HttpMethod::Get, "/echo")
        .with_query_param("id", "42")
        .with_repeated_query_param("tag", ["a", "b"])
        .with_header("X-Token", "abc");

    let echo: Echo = reqwest_client().request_decodable(&endpoint).await.unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query.as_deref(), Some("tag=a&tag=b"));
    assert_eq!(echo.header("x-token"), ["abc".to_string()]);
    assert_eq!(echo.header("user-agent").len(), 1);
    assert!(echo.header("user-agent")[0].starts_with("endpoint-core/"));
}

#[tokio::test]
async fn json_body_is_sent() {
    let addr = start_server().await;
    let endpoint = endpoint(addr, HttpMethod::Post, "/echo/items")
        .with_body_parameter("name", "widget")
        .with_body_parameter("qty", 3);

    let echo: Echo = reqwest_client().request_decodable(&endpoint).await.unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.header("content-type"), ["application/json".to_string()]);
    let body: serde_json::Value = serde_json::from_str(&echo.body).unwrap();
    assert_eq!(body, serde_json::json!({"name": "widget", "qty": 3}));
}

#[tokio::test]
async fn form_body_is_sent() {
    let addr = start_server().await;
    let endpoint = endpoint(addr, HttpMethod::Patch, "/echo/items/7")
        .with_parameter_encoding(ParameterEncoding::Url(UrlEncoding::Standard))
        .with_body_parameter("name", "big widget");

    let echo: Echo = reqwest_client().request_decodable(&endpoint).await.unwrap();
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body, "name=big+widget");
}

#[tokio::test]
async fn elapsed_timeout_is_transport_error() {
    let addr = start_server().await;
    let endpoint = endpoint(addr, HttpMethod::Get, "/slow").with_timeout(Duration::from_millis(200));

    let err = reqwest_client().request_data(&endpoint).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Timeout)), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = reqwest_client()
        .request_data(&endpoint(addr, HttpMethod::Get, "/items/1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn invalid_base_url_is_rejected_before_sending() {
    let endpoint = EndpointDescriptor::new("http://", HttpMethod::Get, "/items/1");

    let err = reqwest_client()
        .request_decodable::<Item, _>(&endpoint)
        .await
        .unwrap_err();
    assert!(err.is_invalid_url());
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let addr = start_server().await;
    let client = reqwest_client();

    let endpoints: Vec<_> = (1..=5)
        .map(|id| endpoint(addr, HttpMethod::Get, &format!("/items/{id}")))
        .collect();
    let (a, b, c, d, e) = tokio::join!(
        client.request_decodable::<Item, _>(&endpoints[0]),
        client.request_decodable::<Item, _>(&endpoints[1]),
        client.request_decodable::<Item, _>(&endpoints[2]),
        client.request_decodable::<Item, _>(&endpoints[3]),
        client.request_decodable::<Item, _>(&endpoints[4]),
    );
    let ids: Vec<u64> = [a, b, c, d, e].into_iter().map(|r| r.unwrap().id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

// ---------------------------------------------------------------------------
// ureq
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ureq_transport_decodes_item() {
    let addr = start_server().await;

    let item: Item = ApiClient::new(UreqTransport)
        .request_decodable(&endpoint(addr, HttpMethod::Get, "/items/42"))
        .await
        .unwrap();
    assert_eq!(item, Item { id: 42 });
}

#[tokio::test]
async fn ureq_transport_classifies_not_found() {
    let addr = start_server().await;

    let err = ApiClient::new(UreqTransport)
        .request_decodable::<Item, _>(&endpoint(addr, HttpMethod::Get, "/items/5000"))
        .await
        .unwrap_err();
    assert_eq!(err.http_kind(), Some(HttpErrorKind::NotFound));
}

#[tokio::test]
async fn ureq_transport_sends_json_body() {
    let addr = start_server().await;
    let endpoint = endpoint(addr, HttpMethod::Put, "/echo/items/3").with_body_parameter("qty", 9);

    let echo: Echo = ApiClient::new(UreqTransport).request_decodable(&endpoint).await.unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.header("content-type"), ["application/json".to_string()]);
    assert_eq!(echo.body, r#"{"qty":9}"#);
}
