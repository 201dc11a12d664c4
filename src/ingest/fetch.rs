// src/ingest/fetch.rs
use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::error::FetchError;
use crate::ingest::config::IngestConfig;
use crate::ingest::types::{ContentKind, RawFetchResult, SourceDescriptor, SourceId};

/// Obtains the raw payload of one source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, source: &'static SourceDescriptor) -> Result<RawFetchResult, FetchError>;
}

/// Request headers sent to a source.
pub trait HeaderPolicy: Send + Sync {
    fn headers(&self, source: &SourceDescriptor) -> HeaderMap;
}

/// Random desktop-browser user agent per request; fixed referer on HTML pages.
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    user_agents: Vec<String>,
    referer: Option<String>,
}

impl BrowserHeaders {
    pub fn new(user_agents: Vec<String>, referer: Option<String>) -> Self {
        Self {
            user_agents,
            referer,
        }
    }

    pub fn from_config(cfg: &IngestConfig) -> Self {
        let referer = Some(cfg.referer.trim().to_string()).filter(|r| !r.is_empty());
        Self::new(cfg.user_agents.clone(), referer)
    }
}

impl HeaderPolicy for BrowserHeaders {
    fn headers(&self, source: &SourceDescriptor) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(ua) = self.user_agents.choose(&mut rand::rng()) {
            match HeaderValue::from_str(ua) {
                Ok(v) => {
                    map.insert(USER_AGENT, v);
                }
                Err(e) => tracing::warn!(error = %e, "skipping invalid user agent"),
            }
        }
        if source.kind == ContentKind::Html {
            if let Some(v) = self
                .referer
                .as_deref()
                .and_then(|r| HeaderValue::from_str(r).ok())
            {
                map.insert(REFERER, v);
            }
        }
        map
    }
}

pub struct HttpFetcher<P = BrowserHeaders> {
    client: reqwest::Client,
    headers: P,
}

impl HttpFetcher<BrowserHeaders> {
    pub fn from_config(cfg: &IngestConfig) -> reqwest::Result<Self> {
        Self::with_policy(
            Duration::from_secs(cfg.fetch_timeout_secs),
            BrowserHeaders::from_config(cfg),
        )
    }
}

impl<P: HeaderPolicy> HttpFetcher<P> {
    pub fn with_policy(timeout: Duration, headers: P) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, headers })
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}

#[async_trait]
impl<P: HeaderPolicy> Fetcher for HttpFetcher<P> {
    async fn fetch(&self, source: &'static SourceDescriptor) -> Result<RawFetchResult, FetchError> {
        let url = source.endpoint;
        tracing::debug!(url, source = %source.id, "fetching");
        let t0 = Instant::now();

        let resp = self
            .client
            .get(url)
            .headers(self.headers.headers(source))
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(|e| classify(url, e))?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_fetch_ms").record(ms);
        tracing::debug!(url, bytes = body.len(), ms, "fetched");

        Ok(RawFetchResult {
            kind: source.kind,
            body,
        })
    }
}

/// Serves canned payloads; sources without one fail with
/// [`FetchError::MissingFixture`].
#[derive(Debug, Default, Clone)]
pub struct FixtureFetcher {
    bodies: HashMap<SourceId, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: SourceId, body: impl Into<String>) -> Self {
        self.bodies.insert(source, body.into());
        self
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, source: &'static SourceDescriptor) -> Result<RawFetchResult, FetchError> {
        self.bodies
            .get(&source.id)
            .map(|body| RawFetchResult {
                kind: source.kind,
                body: body.clone(),
            })
            .ok_or(FetchError::MissingFixture(source.id))
    }
}
