//! Scripted provider doubles for integration testing.
//!
//! `ScriptedTransport` answers `StatsTransport` calls from a route table and
//! records every call. `ScriptedBackend` replays raw HTTP replies underneath
//! a real `ApiSportsClient`. `VirtualClock` and `FixedBackoff` keep time
//! deterministic. Everything is in-memory.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use matchinsight::provider::backoff::{BackoffStrategy, RetryCause};
use matchinsight::provider::governor::{CancelSignal, Clock};
use matchinsight::provider::transport::{HttpBackend, NetworkFailure, RawResponse};
use matchinsight::provider::{QueryParams, StatsTransport};
use matchinsight::types::{InsightError, Sport};

/// What a route answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Data(Value),
    /// Plan restriction, already absorbed by the transport.
    Empty,
    /// Upstream failure with this HTTP status.
    Fail(u16),
}

struct Route {
    endpoint: String,
    param: Option<(&'static str, String)>,
    reply: Reply,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub sport: Sport,
    pub endpoint: String,
    pub query: String,
}

/// Transport answering from a route table. Unrouted calls get `[]`.
pub struct ScriptedTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call to `endpoint`.
    pub fn route(mut self, endpoint: &str, reply: Reply) -> Self {
        self.routes.push(Route {
            endpoint: endpoint.to_string(),
            param: None,
            reply,
        });
        self
    }

    /// Answer calls to `endpoint` carrying `key=value`. Checked in insertion order.
    pub fn route_with(mut self, endpoint: &str, key: &'static str, value: impl ToString, reply: Reply) -> Self {
        self.routes.push(Route {
            endpoint: endpoint.to_string(),
            param: Some((key, value.to_string())),
            reply,
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }

    fn reply_for(&self, endpoint: &str, params: &QueryParams) -> Reply {
        self.routes
            .iter()
            .find(|r| {
                r.endpoint == endpoint
                    && r
                        .param
                        .as_ref()
                        .map_or(true, |(key, value)| params.get(key) == Some(value.as_str()))
            })
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| Reply::Data(json!([])))
    }
}

#[async_trait]
impl StatsTransport for ScriptedTransport {
    async fn call(
        &self,
        sport: Sport,
        endpoint: &str,
        params: &QueryParams,
        cancel: &CancelSignal,
    ) -> Result<Option<Value>, InsightError> {
        cancel.check()?;
        self.calls.lock().unwrap().push(RecordedCall {
            sport,
            endpoint: endpoint.to_string(),
            query: params.to_query_string(),
        });
        match self.reply_for(endpoint, params) {
            Reply::Data(value) => Ok(Some(value)),
            Reply::Empty => Ok(None),
            Reply::Fail(status) => Err(InsightError::Provider {
                endpoint: endpoint.to_string(),
                status: Some(status),
                message: "scripted failure".into(),
            }),
        }
    }
}

/// HTTP backend replaying queued replies, then `{"response": []}` forever.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<RawResponse, NetworkFailure>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<RawResponse, NetworkFailure>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn get(
        &self,
        url: &str,
        _headers: &[(&'static str, String)],
    ) -> Result<RawResponse, NetworkFailure> {
        self.urls.lock().unwrap().push(url.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, r#"{"errors": [], "response": []}"#)))
    }
}

/// Clock that only moves when slept on. Every sleep is recorded.
pub struct VirtualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.elapsed.lock().unwrap() += duration;
        tokio::task::yield_now().await;
    }
}

/// Same delay before every retry.
pub struct FixedBackoff(pub Duration);

impl BackoffStrategy for FixedBackoff {
    fn delay(&self, _cause: RetryCause, _attempt: u32) -> Duration {
        self.0
    }
}
