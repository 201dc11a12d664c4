// src/api.rs
//! Read-only results API over the draw store.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::draw::DrawRecord;
use crate::error::PersistenceError;
use crate::format::{render, OutputFormat, Shape};
use crate::ingest::dates::parse_canonical;
use crate::store::SqliteStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<SqliteStore>,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(latest))
        .route("/results", get(all_results))
        .route("/results/latest", get(latest))
        .route("/results/date/", get(missing_date))
        .route("/results/date/{date}", get(by_date))
        .route("/results/year/", get(missing_year))
        .route("/results/year/{year}", get(by_year))
        .route("/results/month/", get(missing_month))
        .route("/results/month/{month}", get(by_month))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FormatQuery {
    format: Option<String>,
}

impl FormatQuery {
    /// Resolve the output format and count the request, whatever its outcome.
    fn accept(&self, endpoint: &'static str) -> OutputFormat {
        let fmt = OutputFormat::from_query(self.format.as_deref());
        counter!("api_requests_total", "endpoint" => endpoint, "format" => fmt.label())
            .increment(1);
        fmt
    }
}

#[derive(Debug)]
enum ApiError {
    BadRequest(&'static str),
    NotFound(String),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.to_string()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error querying database".to_string(),
            ),
        };
        (status, format!("{msg}\n")).into_response()
    }
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        tracing::error!(error = %e, "store query failed");
        ApiError::Internal
    }
}

/// Run a store query on the blocking pool.
async fn query<T, F>(store: &Arc<SqliteStore>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SqliteStore) -> Result<T, PersistenceError> + Send + 'static,
{
    let store = Arc::clone(store);
    let res = tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store task failed");
            ApiError::Internal
        })?;
    Ok(res?)
}

fn respond(
    draws: &[DrawRecord],
    shape: Shape,
    fmt: OutputFormat,
    not_found: impl FnOnce() -> String,
) -> Result<Response, ApiError> {
    if draws.is_empty() {
        return Err(ApiError::NotFound(not_found()));
    }
    let body = render(draws, shape, fmt).map_err(|e| {
        tracing::error!(error = %e, "encoding response failed");
        ApiError::Internal
    })?;
    Ok(([(header::CONTENT_TYPE, fmt.content_type())], body).into_response())
}

async fn latest(
    State(st): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let fmt = q.accept("latest");
    tracing::debug!("GET latest");
    let draws: Vec<DrawRecord> = query(&st.store, |s| s.latest()).await?.into_iter().collect();
    respond(&draws, Shape::Single, fmt, || "No results found".into())
}

async fn all_results(
    State(st): State<AppState>,
    Query(q): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let fmt = q.accept("all");
    tracing::debug!("GET /results");
    let draws = query(&st.store, |s| s.all()).await?;
    respond(&draws, Shape::Collection, fmt, || "No results found".into())
}

async fn by_date(
    State(st): State<AppState>,
    Path(raw): Path<String>,
    Query(q): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let fmt = q.accept("date");
    tracing::debug!(date = %raw, "GET /results/date");
    let date = parse_canonical(&raw)
        .map_err(|_| ApiError::BadRequest("Invalid date format (use YYYY-MM-DD)"))?;
    let draws: Vec<DrawRecord> = query(&st.store, move |s| s.by_date(date))
        .await?
        .into_iter()
        .collect();
    respond(&draws, Shape::Single, fmt, || {
        "No results found for the specified date".into()
    })
}

async fn by_year(
    State(st): State<AppState>,
    Path(raw): Path<String>,
    Query(q): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let fmt = q.accept("year");
    tracing::debug!(year = %raw, "GET /results/year");
    let year = parse_year(&raw).ok_or(ApiError::BadRequest("Invalid year format (use YYYY)"))?;
    let draws = query(&st.store, move |s| s.by_year(year)).await?;
    respond(&draws, Shape::Collection, fmt, || {
        format!("No results found for the year {raw}")
    })
}

async fn by_month(
    State(st): State<AppState>,
    Path(raw): Path<String>,
    Query(q): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let fmt = q.accept("month");
    tracing::debug!(month = %raw, "GET /results/month");
    let (year, month) = parse_year_month(&raw)
        .ok_or(ApiError::BadRequest("Invalid month/year format (use YYYY-MM)"))?;
    let draws = query(&st.store, move |s| s.by_month(year, month)).await?;
    respond(&draws, Shape::Collection, fmt, || {
        format!("No results found for {raw}")
    })
}

async fn missing_date(Query(q): Query<FormatQuery>) -> ApiError {
    q.accept("date");
    ApiError::BadRequest("Date parameter is required (format YYYY-MM-DD)")
}

async fn missing_year(Query(q): Query<FormatQuery>) -> ApiError {
    q.accept("year");
    ApiError::BadRequest("Year parameter is required (format YYYY)")
}

async fn missing_month(Query(q): Query<FormatQuery>) -> ApiError {
    q.accept("month");
    ApiError::BadRequest("Month/Year parameter is required (format YYYY-MM)")
}

fn parse_year(s: &str) -> Option<i32> {
    (s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
        .then(|| s.parse().ok())
        .flatten()
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.split_once('-')?;
    let year = parse_year(y)?;
    if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}
