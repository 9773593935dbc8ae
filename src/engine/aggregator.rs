//! Per-fixture context aggregation.
//!
//! Resolves both team names, then fans out over form, head-to-head,
//! the next meeting and its details. Only identification can fail the
//! aggregation; every later fetch degrades to `None`.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::provider::governor::CancelSignal;
use crate::provider::normalize::{self, UpcomingFixture};
use crate::provider::{QueryParams, StatsTransport};
use crate::resolver::TeamResolver;
use crate::types::{
    FixtureId, InsightError, MatchContext, MatchDetails, MatchSummary, Sport, StandingRow, TeamId,
    TeamSnapshot,
};

/// Completed matches fetched per team.
const FORM_WINDOW: u32 = 5;

/// Past meetings fetched for head-to-head.
const H2H_WINDOW: u32 = 5;

/// Status filter for completed matches.
const FINISHED_STATUS: &str = "FT";

/// Everything hanging off the next meeting between the two teams.
#[derive(Debug, Default)]
struct FixtureSide {
    upcoming: Option<UpcomingFixture>,
    details: MatchDetails,
    standings: Option<Vec<StandingRow>>,
}

pub struct Aggregator {
    transport: Arc<dyn StatsTransport>,
    resolver: Arc<TeamResolver>,
}

impl Aggregator {
    pub fn new(transport: Arc<dyn StatsTransport>, resolver: Arc<TeamResolver>) -> Self {
        Self { transport, resolver }
    }

    pub fn resolver(&self) -> &Arc<TeamResolver> {
        &self.resolver
    }

    /// Build the match context for `home` vs `away`.
    ///
    /// Fails with `TeamNotFound` if either name cannot be resolved, and
    /// with `Cancelled` if the signal fires. Everything else is absorbed.
    pub async fn aggregate(
        &self,
        sport: Sport,
        home: &str,
        away: &str,
        cancel: &CancelSignal,
    ) -> Result<MatchContext, InsightError> {
        let (home_id, away_id) = tokio::join!(
            self.resolver.resolve(sport, home, cancel),
            self.resolver.resolve(sport, away, cancel),
        );
        let home_id = home_id?.ok_or_else(|| InsightError::TeamNotFound {
            sport,
            name: home.to_string(),
        })?;
        let away_id = away_id?.ok_or_else(|| InsightError::TeamNotFound {
            sport,
            name: away.to_string(),
        })?;
        debug!(sport = %sport, home, home_id, away, away_id, "Teams identified");

        let (home_side, away_side, head_to_head, fixture_side) = tokio::join!(
            self.team_side(sport, home_id, cancel),
            self.team_side(sport, away_id, cancel),
            self.head_to_head(sport, home_id, away_id, cancel),
            self.fixture_side(sport, home_id, away_id, cancel),
        );
        let (home_form, home_stats) = home_side?;
        let (away_form, away_stats) = away_side?;
        let head_to_head = head_to_head?;
        let fixture_side = fixture_side?;

        let mut context = MatchContext::bare(
            sport,
            TeamSnapshot {
                name: home.to_string(),
                id: home_id,
                recent_matches: home_form,
                last_match_advanced_stats: home_stats,
            },
            TeamSnapshot {
                name: away.to_string(),
                id: away_id,
                recent_matches: away_form,
                last_match_advanced_stats: away_stats,
            },
        );
        context.head_to_head = head_to_head;
        context.meta = fixture_side.upcoming.map(|u| u.meta);
        context.details = fixture_side.details;
        context.standings = fixture_side.standings;

        info!(
            sport = %sport,
            home,
            away,
            missing = ?context.missing_fields(),
            "Match context assembled"
        );
        Ok(context)
    }

    /// One provider call whose failure only empties the field it feeds.
    async fn soft_fetch(
        &self,
        sport: Sport,
        endpoint: &str,
        params: QueryParams,
        cancel: &CancelSignal,
    ) -> Result<Option<Value>, InsightError> {
        match self.transport.call(sport, endpoint, &params, cancel).await {
            Ok(data) => Ok(data),
            Err(InsightError::Cancelled) => Err(InsightError::Cancelled),
            Err(e) => {
                warn!(sport = %sport, endpoint, error = %e, "Sub-fetch failed, leaving field empty");
                Ok(None)
            }
        }
    }

    /// Recent form, then the advanced stats of the latest match in it.
    async fn team_side(
        &self,
        sport: Sport,
        team_id: TeamId,
        cancel: &CancelSignal,
    ) -> Result<(Option<Vec<MatchSummary>>, Option<Value>), InsightError> {
        let endpoint = format!("/{}", sport.match_endpoint());
        let params = QueryParams::new()
            .with("team", team_id)
            .with("last", FORM_WINDOW)
            .with("status", FINISHED_STATUS);
        let form = self
            .soft_fetch(sport, &endpoint, params, cancel)
            .await?
            .map(|data| normalize::match_summaries(&data));

        let latest = form
            .as_ref()
            .and_then(|matches| matches.first())
            .and_then(|m| m.fixture_id);
        let stats = match latest {
            Some(fixture_id) if sport.has_advanced_stats() => {
                self.fixture_scoped(sport, "/fixtures/statistics", fixture_id, cancel)
                    .await?
            }
            _ => None,
        };
        Ok((form, stats))
    }

    async fn head_to_head(
        &self,
        sport: Sport,
        home_id: TeamId,
        away_id: TeamId,
        cancel: &CancelSignal,
    ) -> Result<Option<Vec<MatchSummary>>, InsightError> {
        let endpoint = format!("/{}/headtohead", sport.match_endpoint());
        let params = QueryParams::new()
            .with("h2h", format!("{home_id}-{away_id}"))
            .with("last", H2H_WINDOW);
        Ok(self
            .soft_fetch(sport, &endpoint, params, cancel)
            .await?
            .map(|data| normalize::match_summaries(&data)))
    }

    /// Next meeting, its lineups/odds/injuries, and the league table.
    async fn fixture_side(
        &self,
        sport: Sport,
        home_id: TeamId,
        away_id: TeamId,
        cancel: &CancelSignal,
    ) -> Result<FixtureSide, InsightError> {
        let endpoint = match sport {
            Sport::Football => "/fixtures/headtohead".to_string(),
            _ => format!("/{}", sport.match_endpoint()),
        };
        let params = QueryParams::new()
            .with("h2h", format!("{home_id}-{away_id}"))
            .with("next", 1);
        let upcoming = self
            .soft_fetch(sport, &endpoint, params, cancel)
            .await?
            .and_then(|data| normalize::upcoming_fixture(&data));

        let Some(upcoming) = upcoming else {
            debug!(sport = %sport, home_id, away_id, "No upcoming fixture found");
            return Ok(FixtureSide::default());
        };

        let details_fut = async {
            match upcoming.fixture_id {
                Some(fixture_id) if sport.has_fixture_details() => {
                    self.fixture_details(sport, fixture_id, cancel).await
                }
                _ => Ok(MatchDetails::default()),
            }
        };
        let standings_fut = async {
            match (upcoming.league_id, upcoming.season.as_deref()) {
                (Some(league_id), Some(season)) => {
                    let params = QueryParams::new()
                        .with("league", league_id)
                        .with("season", season);
                    Ok(self
                        .soft_fetch(sport, "/standings", params, cancel)
                        .await?
                        .and_then(|data| normalize::standings(&data)))
                }
                _ => Ok(None),
            }
        };
        let (details, standings) = tokio::join!(details_fut, standings_fut);

        Ok(FixtureSide {
            details: details?,
            standings: standings?,
            upcoming: Some(upcoming),
        })
    }

    async fn fixture_details(
        &self,
        sport: Sport,
        fixture_id: FixtureId,
        cancel: &CancelSignal,
    ) -> Result<MatchDetails, InsightError> {
        let (lineups, odds, injuries) = tokio::join!(
            self.fixture_scoped(sport, "/fixtures/lineups", fixture_id, cancel),
            self.fixture_scoped(sport, "/odds", fixture_id, cancel),
            self.fixture_scoped(sport, "/injuries", fixture_id, cancel),
        );
        Ok(MatchDetails {
            lineups: lineups?,
            odds: odds?.and_then(|data| normalize::odds_triple(&data)),
            injuries: injuries?,
        })
    }

    async fn fixture_scoped(
        &self,
        sport: Sport,
        endpoint: &str,
        fixture_id: FixtureId,
        cancel: &CancelSignal,
    ) -> Result<Option<Value>, InsightError> {
        let params = QueryParams::new().with("fixture", fixture_id);
        self.soft_fetch(sport, endpoint, params, cancel).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
