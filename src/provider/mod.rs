//! Statistics provider access.
//!
//! Defines the `StatsTransport` trait, the single chokepoint every
//! provider call passes through, plus the rate governor, retry policy
//! and response normalization that sit behind it.

pub mod backoff;
pub mod governor;
pub mod normalize;
pub mod transport;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{InsightError, Sport};
use governor::CancelSignal;

/// Ordered query parameters for one provider call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Percent-encoded `?k=v&...` suffix, empty when there are no params.
    pub fn to_query_string(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("?{}", pairs.join("&"))
    }
}

/// Rate-governed call primitive against the statistics provider.
///
/// `Ok(None)` means the provider had nothing to give or denied the call
/// for plan reasons. Errors are terminal for that call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsTransport: Send + Sync {
    async fn call(
        &self,
        sport: Sport,
        endpoint: &str,
        params: &QueryParams,
        cancel: &CancelSignal,
    ) -> Result<Option<Value>, InsightError>;
}
