//! Core engine: fixture aggregation, batch enrichment, reconciliation.
//!
//! `MatchInsight` wires one transport, one resolver and one clock together
//! and exposes the operations callers use.

pub mod aggregator;
pub mod pipeline;
pub mod reconciler;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, BatchConfig};
use crate::provider::governor::{CancelSignal, Clock, MinIntervalGate, TokioClock};
use crate::provider::transport::{ApiSportsClient, ReqwestBackend};
use crate::provider::StatsTransport;
use crate::resolver::TeamResolver;
use crate::types::{
    BatchAnalysis, EnrichedFixture, FixtureRequest, InsightError, MatchContext, Prediction,
    ReconciledPrediction, Sport, TeamId,
};
use aggregator::Aggregator;
use pipeline::BatchPipeline;
use reconciler::{AnalysisMode, Reconciler};

pub struct MatchInsight {
    resolver: Arc<TeamResolver>,
    aggregator: Arc<Aggregator>,
    pipeline: BatchPipeline,
}

impl MatchInsight {
    pub fn new(transport: Arc<dyn StatsTransport>, clock: Arc<dyn Clock>, batch: &BatchConfig) -> Self {
        let resolver = Arc::new(TeamResolver::new(transport.clone()));
        let aggregator = Arc::new(Aggregator::new(transport, resolver.clone()));
        let pipeline = BatchPipeline::new(aggregator.clone(), clock, batch);
        Self {
            resolver,
            aggregator,
            pipeline,
        }
    }

    /// Build the production stack: reqwest backend, wall clock, api-sports hosts.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(TokioClock);
        let gate = Arc::new(MinIntervalGate::new(cfg.provider.min_interval(), clock.clone()));
        let backend = Arc::new(ReqwestBackend::new(cfg.provider.request_timeout())?);

        let mut client = ApiSportsClient::new(
            backend,
            gate,
            Arc::new(cfg.provider.backoff()),
            cfg.provider.api_key()?,
        )
        .with_max_retries(cfg.provider.max_retries);
        if let Some(base_url) = &cfg.provider.base_url {
            client = client.with_base_url(base_url.clone());
        }

        info!(
            min_interval_ms = cfg.provider.min_interval_ms,
            max_retries = cfg.provider.max_retries,
            group_size = cfg.batch.group_size,
            "Match insight engine configured"
        );
        Ok(Self::new(Arc::new(client), clock, &cfg.batch))
    }

    pub async fn resolve_team(&self, sport: Sport, name: &str) -> Result<Option<TeamId>, InsightError> {
        self.resolver.resolve(sport, name, &CancelSignal::never()).await
    }

    pub async fn get_match_context(
        &self,
        sport: Sport,
        home: &str,
        away: &str,
    ) -> Result<MatchContext, InsightError> {
        self.get_match_context_with(sport, home, away, &CancelSignal::never())
            .await
    }

    pub async fn get_match_context_with(
        &self,
        sport: Sport,
        home: &str,
        away: &str,
        cancel: &CancelSignal,
    ) -> Result<MatchContext, InsightError> {
        self.aggregator.aggregate(sport, home, away, cancel).await
    }

    pub async fn enrich_batch<F>(
        &self,
        requests: &[FixtureRequest],
        on_progress: F,
        cancel: &CancelSignal,
    ) -> Result<Vec<EnrichedFixture>, InsightError>
    where
        F: FnMut(usize, usize),
    {
        self.pipeline.enrich_all(requests, on_progress, cancel).await
    }

    pub fn reconcile(
        &self,
        predictions: Vec<Prediction>,
        requests: &[FixtureRequest],
        enriched: &[EnrichedFixture],
    ) -> Vec<ReconciledPrediction> {
        Reconciler::default().reconcile(predictions, requests, enriched)
    }

    pub fn reconcile_with_mode(
        &self,
        analysis: BatchAnalysis,
        mode: AnalysisMode,
        requests: &[FixtureRequest],
        enriched: &[EnrichedFixture],
    ) -> BatchAnalysis<ReconciledPrediction> {
        Reconciler::new(mode).reconcile_analysis(analysis, requests, enriched)
    }
}
