//! End-to-end through `HttpPageFetcher` against a one-shot local HTTP responder.

use pagewise::config::{BackendConfig, CollectionConfig};
use pagewise::fetch::{HttpPageFetcher, PageFetcher};
use pagewise::{CollectionController, FetchError, Identity, PageQuery, Role};
use serde::Deserialize;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

/// Serve exactly one request with `status` and `body`; returns the base URL and a
/// handle yielding the raw request head.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).to_string()
    });
    (base_url, handle)
}

fn backend(base_url: String) -> BackendConfig {
    BackendConfig {
        base_url,
        timeout_ms: 5_000,
        token: None,
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Expense {
    id: u32,
    title: String,
}

#[tokio::test]
async fn controller_loads_page_over_http() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"data":[{"id":1,"title":"Rent"},{"id":2,"title":"Coffee"}],"page":1,"totalPages":4,"total":31}"#,
    );
    let fetcher: HttpPageFetcher<Expense> =
        HttpPageFetcher::new(&backend(base_url), "expenses", Some("tok-123".into())).unwrap();
    let controller = CollectionController::new(
        Arc::new(fetcher),
        &CollectionConfig::default(),
        Role::Member,
        &Identity::new("u-5"),
    );
    controller.set_search("  rent ").unwrap();

    controller.refresh().await;
    let state = controller.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[0].title, "Rent");
    assert_eq!(state.total_pages, 4);
    assert_eq!(state.total_count, 31);
    assert!(state.has_more());

    let request = server.join().unwrap();
    let request_line = request.lines().next().unwrap_or_default().to_string();
    assert!(request_line.starts_with("GET /api/expenses?page=1&limit=10&search=rent&ownerId=u-5 "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn unauthorized_response_is_auth_error() {
    let (base_url, server) = serve_once("401 Unauthorized", r#"{"message":"jwt expired"}"#);
    let fetcher: HttpPageFetcher<Expense> =
        HttpPageFetcher::new(&backend(base_url), "expenses", None).unwrap();

    let err = fetcher.fetch_page(&PageQuery::new(1, 10)).await.unwrap_err();
    assert_eq!(err, FetchError::Auth("jwt expired".into()));
    server.join().unwrap();
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"unexpected":true}"#);
    let fetcher: HttpPageFetcher<Expense> =
        HttpPageFetcher::new(&backend(base_url), "expenses", None).unwrap();

    let err = fetcher.fetch_page(&PageQuery::new(1, 10)).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    server.join().unwrap();
}
