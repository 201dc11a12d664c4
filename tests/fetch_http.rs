// tests/fetch_http.rs
//
// HttpFetcher against a local axum server on an ephemeral port.
//
// Covered:
// - non-2xx answers map to FetchError::Status
// - a response slower than the client timeout maps to FetchError::Timeout
// - the header policy reaches the wire (referer on HTML only)

use std::time::Duration;

use axum::{
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use euromillions::error::FetchError;
use euromillions::ingest::dates::DateFormat;
use euromillions::ingest::fetch::{BrowserHeaders, Fetcher, HttpFetcher};
use euromillions::ingest::types::{ContentKind, SourceDescriptor};
use euromillions::SourceId;

const UA: &str = "euromillions-test/1.0";
const REFERER: &str = "https://www.bing.com/?cc=pt";

/// Start the stub site and return its base URL.
async fn spawn_site() -> String {
    let app = Router::new()
        .route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route(
            "/echo",
            get(|headers: HeaderMap| async move {
                let h = |name: header::HeaderName| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-")
                        .to_string()
                };
                format!("{}|{}", h(header::USER_AGENT), h(header::REFERER))
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Descriptor pointing at the stub site; leaked to satisfy the `'static` fetch API.
fn local(base: &str, path: &str, kind: ContentKind) -> &'static SourceDescriptor {
    Box::leak(Box::new(SourceDescriptor {
        id: SourceId::SantaCasa,
        name: "local",
        endpoint: Box::leak(format!("{base}{path}").into_boxed_str()),
        kind,
        date_format: DateFormat::SlashDmy,
    }))
}

fn fetcher(timeout: Duration) -> HttpFetcher {
    let policy = BrowserHeaders::new(vec![UA.to_string()], Some(REFERER.to_string()));
    HttpFetcher::with_policy(timeout, policy).unwrap()
}

#[tokio::test]
async fn service_unavailable_is_a_status_error() {
    let base = spawn_site().await;
    let err = fetcher(Duration::from_secs(5))
        .fetch(local(&base, "/down", ContentKind::Html))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Status { status: 503, ref url } if url.ends_with("/down")),
        "{err:?}"
    );
}

#[tokio::test]
async fn slow_source_times_out() {
    let base = spawn_site().await;
    let err = fetcher(Duration::from_millis(50))
        .fetch(local(&base, "/slow", ContentKind::Html))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn headers_reach_the_wire() {
    let base = spawn_site().await;
    let f = fetcher(Duration::from_secs(5));

    let html = f.fetch(local(&base, "/echo", ContentKind::Html)).await.unwrap();
    assert_eq!(html.kind, ContentKind::Html);
    assert_eq!(html.body, format!("{UA}|{REFERER}"));

    // The CSV feed gets the user agent alone.
    let csv = f.fetch(local(&base, "/echo", ContentKind::Csv)).await.unwrap();
    assert_eq!(csv.kind, ContentKind::Csv);
    assert_eq!(csv.body, format!("{UA}|-"));
}
