//! Batch enrichment pipeline.
//!
//! Runs the aggregator over a list of fixtures in small groups, pausing
//! between groups, reporting progress after each one. A failed item is
//! logged and kept with an empty context; only cancellation stops the run.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::aggregator::Aggregator;
use crate::config::BatchConfig;
use crate::provider::governor::{cancellable_sleep, CancelSignal, Clock};
use crate::types::{EnrichedFixture, FixtureRequest, InsightError};

pub struct BatchPipeline {
    aggregator: Arc<Aggregator>,
    clock: Arc<dyn Clock>,
    group_size: usize,
    group_pause: Duration,
}

impl BatchPipeline {
    pub fn new(aggregator: Arc<Aggregator>, clock: Arc<dyn Clock>, config: &BatchConfig) -> Self {
        Self {
            aggregator,
            clock,
            group_size: config.group_size.max(1),
            group_pause: config.group_pause(),
        }
    }

    /// Enrich every request, in input order.
    ///
    /// `on_progress(completed, total)` fires after each group. Returns
    /// `Err(Cancelled)` as soon as the signal is seen; no group is
    /// started after that.
    pub async fn enrich_all<F>(
        &self,
        requests: &[FixtureRequest],
        mut on_progress: F,
        cancel: &CancelSignal,
    ) -> Result<Vec<EnrichedFixture>, InsightError>
    where
        F: FnMut(usize, usize),
    {
        let total = requests.len();
        let run_id = Uuid::new_v4();
        let span = info_span!("enrich_batch", %run_id, total);

        async move {
            info!(group_size = self.group_size, "Starting batch enrichment");
            let mut enriched = Vec::with_capacity(total);

            for (index, group) in requests.chunks(self.group_size).enumerate() {
                cancel.check()?;
                if index > 0 && !self.group_pause.is_zero() {
                    cancellable_sleep(self.clock.as_ref(), self.group_pause, cancel).await?;
                }

                let results = join_all(group.iter().map(|request| self.enrich_one(request, cancel))).await;
                for result in results {
                    enriched.push(result?);
                }
                on_progress(enriched.len(), total);
            }

            let failed = enriched.iter().filter(|e| !e.is_enriched()).count();
            info!(enriched = total - failed, failed, "Batch enrichment complete");
            Ok::<_, InsightError>(enriched)
        }
        .instrument(span)
        .await
    }

    async fn enrich_one(
        &self,
        request: &FixtureRequest,
        cancel: &CancelSignal,
    ) -> Result<EnrichedFixture, InsightError> {
        let context = match self
            .aggregator
            .aggregate(request.sport, &request.home_team, &request.away_team, cancel)
            .await
        {
            Ok(context) => Some(context),
            Err(InsightError::Cancelled) => return Err(InsightError::Cancelled),
            Err(e) => {
                warn!(fixture = %request, error = %e, "Enrichment failed, keeping empty context");
                None
            }
        };
        Ok(EnrichedFixture {
            request: request.clone(),
            context,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
