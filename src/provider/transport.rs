//! API-Sports transport.
//!
//! Every request goes through the shared `MinIntervalGate`, is retried
//! with backoff on throttling and transient network failure, and has
//! plan-restriction denials turned into `Ok(None)`.
//!
//! API: `https://v3.football.api-sports.io/` (and `v1.<sport>` for the rest)
//! Auth: `x-apisports-key` header.
//! Responses are an envelope `{ errors, results, response }`; `errors` may
//! be populated even on HTTP 200.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::backoff::{BackoffStrategy, RetryCause};
use super::governor::{cancellable_sleep, CancelSignal, MinIntervalGate};
use super::{QueryParams, StatsTransport};
use crate::types::{InsightError, Sport};

/// Default retry budget per call.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const AUTH_HEADER: &str = "x-apisports-key";

// ---------------------------------------------------------------------------
// HTTP backend
// ---------------------------------------------------------------------------

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Connection-level failure: reset, DNS, timeout, truncated body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct NetworkFailure(pub String);

/// Raw GET capability the transport is built on.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<RawResponse, NetworkFailure>;
}

pub struct ReqwestBackend {
    http: Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Duration) -> Result<Self, InsightError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("MatchInsight/0.1.0")
            .build()
            .map_err(|e| InsightError::Config(format!("Failed to build provider HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<RawResponse, NetworkFailure> {
        let mut request = self.http.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| NetworkFailure(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkFailure(format!("failed to read body: {e}")))?;
        Ok(RawResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Value,
}

fn mentions_rate_limit(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("ratelimit") || lower.contains("rate limit") || lower.contains("too many requests")
}

fn mentions_plan_restriction(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("plan") || lower.contains("access")
}

fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Map one HTTP exchange to data or a typed failure.
///
/// `RateLimited` and `PlanRestricted` returned from here are internal
/// signals; `ApiSportsClient::call` retries or absorbs them.
pub(crate) fn classify(endpoint: &str, raw: &RawResponse) -> Result<Option<Value>, InsightError> {
    if raw.status == 429 {
        return Err(InsightError::RateLimited {
            endpoint: endpoint.to_string(),
            attempts: 1,
        });
    }

    if !(200..300).contains(&raw.status) {
        if raw.status == 403 || mentions_plan_restriction(&raw.body) {
            return Err(InsightError::PlanRestricted {
                endpoint: endpoint.to_string(),
                message: raw.body.clone(),
            });
        }
        return Err(InsightError::Provider {
            endpoint: endpoint.to_string(),
            status: Some(raw.status),
            message: raw.body.chars().take(200).collect(),
        });
    }

    let envelope: ApiEnvelope = serde_json::from_str(&raw.body).map_err(|e| InsightError::Provider {
        endpoint: endpoint.to_string(),
        status: Some(raw.status),
        message: format!("malformed body: {e}"),
    })?;

    if has_errors(&envelope.errors) {
        let text = envelope.errors.to_string();
        if mentions_rate_limit(&text) {
            return Err(InsightError::RateLimited {
                endpoint: endpoint.to_string(),
                attempts: 1,
            });
        }
        if mentions_plan_restriction(&text) {
            return Err(InsightError::PlanRestricted {
                endpoint: endpoint.to_string(),
                message: text,
            });
        }
        warn!(endpoint, errors = %text, "Provider reported errors alongside data");
    }

    Ok(match envelope.response {
        Value::Null => None,
        other => Some(other),
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiSportsClient {
    backend: Arc<dyn HttpBackend>,
    gate: Arc<MinIntervalGate>,
    backoff: Arc<dyn BackoffStrategy>,
    api_key: SecretString,
    base_url: Option<String>,
    max_retries: u32,
    total_calls: AtomicU64,
}

impl ApiSportsClient {
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        gate: Arc<MinIntervalGate>,
        backoff: Arc<dyn BackoffStrategy>,
        api_key: SecretString,
    ) -> Self {
        Self {
            backend,
            gate,
            backoff,
            api_key,
            base_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
            total_calls: AtomicU64::new(0),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send every sport to one base URL instead of the per-sport hosts.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Outbound HTTP requests made so far, retries included.
    pub fn total_calls(&self) -> u64 {
        self.total_calls.load(Ordering::Relaxed)
    }

    fn url_for(&self, sport: Sport, endpoint: &str, params: &QueryParams) -> String {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}", sport.host()),
        };
        format!("{base}{endpoint}{}", params.to_query_string())
    }
}

#[async_trait]
impl StatsTransport for ApiSportsClient {
    async fn call(
        &self,
        sport: Sport,
        endpoint: &str,
        params: &QueryParams,
        cancel: &CancelSignal,
    ) -> Result<Option<Value>, InsightError> {
        let url = self.url_for(sport, endpoint, params);
        let headers = [(AUTH_HEADER, self.api_key.expose_secret().clone())];
        let mut retries = 0u32;

        loop {
            self.gate.admit(cancel).await?;
            self.total_calls.fetch_add(1, Ordering::Relaxed);
            debug!(sport = %sport, endpoint, attempt = retries + 1, "Calling provider");

            let outcome = match self.backend.get(&url, &headers).await {
                Ok(raw) => classify(endpoint, &raw),
                Err(failure) => Err(InsightError::Network {
                    endpoint: endpoint.to_string(),
                    message: failure.to_string(),
                }),
            };

            let err = match outcome {
                Ok(data) => return Ok(data),
                Err(InsightError::PlanRestricted { message, .. }) => {
                    warn!(sport = %sport, endpoint, message = %message, "Plan restriction, skipping data");
                    return Ok(None);
                }
                Err(err) => err,
            };

            let cause = match &err {
                InsightError::RateLimited { .. } => RetryCause::RateLimited,
                InsightError::Network { .. } => RetryCause::Network,
                _ => return Err(err),
            };

            if retries >= self.max_retries {
                return Err(match cause {
                    RetryCause::RateLimited => InsightError::RateLimited {
                        endpoint: endpoint.to_string(),
                        attempts: retries + 1,
                    },
                    RetryCause::Network => err,
                });
            }

            retries += 1;
            let delay = self.backoff.delay(cause, retries);
            warn!(
                sport = %sport,
                endpoint,
                attempt = retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retryable provider error"
            );
            cancellable_sleep(self.gate.clock(), delay, cancel).await?;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
