use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use matchinsight::provider::governor::{cancel_pair, CancelSignal, MinIntervalGate};
use matchinsight::provider::transport::{ApiSportsClient, RawResponse};
use matchinsight::provider::{QueryParams, StatsTransport};
use matchinsight::types::{InsightError, Sport};

use crate::mock_transport::{FixedBackoff, ScriptedBackend, VirtualClock};

const INTERVAL: Duration = Duration::from_secs(6);

fn client(backend: Arc<ScriptedBackend>, clock: Arc<VirtualClock>) -> ApiSportsClient {
    let gate = Arc::new(MinIntervalGate::new(INTERVAL, clock));
    ApiSportsClient::new(
        backend,
        gate,
        Arc::new(FixedBackoff(Duration::from_secs(3))),
        SecretString::new("test-key".into()),
    )
}

#[tokio::test]
async fn test_concurrent_calls_are_spaced_by_interval() {
    let clock = Arc::new(VirtualClock::new());
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let client = client(backend.clone(), clock.clone());
    let cancel = CancelSignal::never();
    let params = QueryParams::new().with("search", "Arsenal");

    let (a, b, c) = tokio::join!(
        client.call(Sport::Football, "/teams", &params, &cancel),
        client.call(Sport::Basketball, "/teams", &params, &cancel),
        client.call(Sport::Hockey, "/teams", &params, &cancel),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    assert_eq!(client.total_calls(), 3);
    assert_eq!(clock.sleeps(), vec![INTERVAL, INTERVAL]);
    assert_eq!(clock.elapsed(), INTERVAL * 2);
    assert_eq!(
        backend.urls()[0],
        "https://v3.football.api-sports.io/teams?search=Arsenal"
    );
}

#[tokio::test]
async fn test_throttled_then_success() {
    let clock = Arc::new(VirtualClock::new());
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(RawResponse::new(429, "Too Many Requests")),
        Ok(RawResponse::new(200, r#"{"errors": [], "response": [{"team": {"id": 42}}]}"#)),
    ]));
    let client = client(backend, clock.clone());

    let data = client
        .call(Sport::Football, "/teams", &QueryParams::new(), &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(data, Some(json!([{"team": {"id": 42}}])));
    assert_eq!(client.total_calls(), 2);
    // Backoff first, then the gate waits out the rest of the interval.
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(3), Duration::from_secs(3)]);
}

#[tokio::test]
async fn test_retry_budget_exhausted() {
    let clock = Arc::new(VirtualClock::new());
    let throttled = (0..4)
        .map(|_| Ok(RawResponse::new(200, r#"{"errors": {"rateLimit": "Too many requests"}, "response": []}"#)))
        .collect();
    let backend = Arc::new(ScriptedBackend::new(throttled));
    let client = client(backend, clock).with_max_retries(3);

    let err = client
        .call(Sport::Football, "/standings", &QueryParams::new(), &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(err, InsightError::RateLimited { attempts: 4, .. }));
    assert_eq!(client.total_calls(), 4);
}

#[tokio::test]
async fn test_plan_restriction_is_soft() {
    let clock = Arc::new(VirtualClock::new());
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(RawResponse::new(
        200,
        r#"{"errors": {"plan": "Free plans do not have access to this season"}, "response": []}"#,
    ))]));
    let client = client(backend, clock);

    let data = client
        .call(Sport::Football, "/injuries", &QueryParams::new().with("fixture", 1), &CancelSignal::never())
        .await
        .unwrap();
    assert_eq!(data, None);
    assert_eq!(client.total_calls(), 1);
}

#[tokio::test]
async fn test_cancelled_call_never_reaches_backend() {
    let clock = Arc::new(VirtualClock::new());
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let client = client(backend.clone(), clock);
    let (handle, signal) = cancel_pair();
    handle.cancel();

    let err = client
        .call(Sport::Football, "/teams", &QueryParams::new(), &signal)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(backend.urls().is_empty());
}
