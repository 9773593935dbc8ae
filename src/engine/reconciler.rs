//! Joins reasoning output back onto the requests that produced it.
//!
//! Matching precedence: exact on both folded team names, then containment
//! on both (either direction). A containment hit on more than one request
//! is treated as no match. Odds always come from the enriched context.

use tracing::{debug, warn};

use crate::types::{
    BatchAnalysis, Combination, EnrichedFixture, FixtureRequest, GameType, OddsTriple, Prediction,
    ReconciledPrediction,
};

/// Keys the reconciled record owns. Echoes of them in the reasoning output
/// are dropped so each appears once on the wire.
const OWNED_KEYS: &[&str] = &["odds", "homeTeamKo", "awayTeamKo", "matched"];

/// Case and whitespace fold used for every name comparison.
pub fn match_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// How the reasoning step was asked to analyse the fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// One prediction per fixture, game type fixed by each request.
    #[default]
    Full,
    /// Ticket building for a target market.
    Combination { target: GameType },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    Exact,
    Contained,
}

struct Keyed<'a> {
    home: String,
    away: String,
    request: &'a FixtureRequest,
}

impl<'a> Keyed<'a> {
    fn new(request: &'a FixtureRequest) -> Self {
        Self {
            home: match_key(&request.home_team),
            away: match_key(&request.away_team),
            request,
        }
    }
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    mode: AnalysisMode,
}

impl Reconciler {
    pub fn new(mode: AnalysisMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Reconcile a flat list of predictions, preserving their order.
    pub fn reconcile(
        &self,
        predictions: Vec<Prediction>,
        requests: &[FixtureRequest],
        enriched: &[EnrichedFixture],
    ) -> Vec<ReconciledPrediction> {
        let keyed: Vec<Keyed<'_>> = requests.iter().map(Keyed::new).collect();
        predictions
            .into_iter()
            .map(|p| self.reconcile_one(p, &keyed, enriched))
            .collect()
    }

    /// Reconcile both the per-match list and every recommended combination.
    pub fn reconcile_analysis(
        &self,
        analysis: BatchAnalysis,
        requests: &[FixtureRequest],
        enriched: &[EnrichedFixture],
    ) -> BatchAnalysis<ReconciledPrediction> {
        let keyed: Vec<Keyed<'_>> = requests.iter().map(Keyed::new).collect();
        let reconcile_all = |predictions: Vec<Prediction>| -> Vec<ReconciledPrediction> {
            predictions
                .into_iter()
                .map(|p| self.reconcile_one(p, &keyed, enriched))
                .collect()
        };

        let matches = reconcile_all(analysis.matches);
        let recommended_combinations = analysis
            .recommended_combinations
            .into_iter()
            .map(|combo| Combination {
                rank: combo.rank,
                total_reason: combo.total_reason,
                expected_value: combo.expected_value,
                risk_validation: combo.risk_validation,
                matches: reconcile_all(combo.matches),
            })
            .collect();

        BatchAnalysis {
            matches,
            recommended_combinations,
        }
    }

    fn reconcile_one(
        &self,
        mut prediction: Prediction,
        keyed: &[Keyed<'_>],
        enriched: &[EnrichedFixture],
    ) -> ReconciledPrediction {
        for key in OWNED_KEYS {
            prediction.extra.remove(*key);
        }

        let Some((request, kind)) = find_request(&prediction, keyed) else {
            debug!(
                home = %prediction.home_team,
                away = %prediction.away_team,
                "Prediction has no originating request"
            );
            return ReconciledPrediction {
                home_team_ko: prediction.home_team.clone(),
                away_team_ko: prediction.away_team.clone(),
                odds: None,
                matched: false,
                prediction,
            };
        };
        if kind == MatchKind::Contained {
            debug!(
                home = %prediction.home_team,
                away = %prediction.away_team,
                request = %request,
                "Prediction matched by containment"
            );
        }

        let game_type = self.game_type(request, prediction.game_type);
        let criteria = match &request.criteria {
            Some(criteria) => Some(criteria.clone()),
            None if self.reasoning_picks(request) => prediction.criteria.take(),
            None => None,
        };

        prediction.sport = Some(request.sport.as_str().to_string());
        prediction.game_type = Some(game_type);
        prediction.criteria = criteria;

        ReconciledPrediction {
            home_team_ko: request
                .home_team_ko
                .clone()
                .unwrap_or_else(|| prediction.home_team.clone()),
            away_team_ko: request
                .away_team_ko
                .clone()
                .unwrap_or_else(|| prediction.away_team.clone()),
            odds: odds_for(request, enriched),
            matched: true,
            prediction,
        }
    }

    /// Whether the market type is left to the reasoning step for `request`.
    fn reasoning_picks(&self, request: &FixtureRequest) -> bool {
        match (self.mode, request.game_type) {
            (AnalysisMode::Full, Some(GameType::Mixed)) => true,
            (
                AnalysisMode::Combination { target },
                None | Some(GameType::General) | Some(GameType::Mixed),
            ) => target == GameType::Mixed,
            _ => false,
        }
    }

    /// Resolved market type. Never `Mixed`.
    fn game_type(&self, request: &FixtureRequest, chosen: Option<GameType>) -> GameType {
        if self.reasoning_picks(request) {
            return match chosen {
                Some(GameType::Mixed) | None => GameType::General,
                Some(picked) => picked,
            };
        }
        match (self.mode, request.game_type) {
            (AnalysisMode::Full, own) => own.unwrap_or_default(),
            (AnalysisMode::Combination { .. }, Some(own))
                if own != GameType::General && own != GameType::Mixed =>
            {
                own
            }
            (AnalysisMode::Combination { target }, _) => target,
        }
    }
}

fn find_request<'a>(prediction: &Prediction, keyed: &[Keyed<'a>]) -> Option<(&'a FixtureRequest, MatchKind)> {
    let home = match_key(&prediction.home_team);
    let away = match_key(&prediction.away_team);

    if let Some(k) = keyed.iter().find(|k| k.home == home && k.away == away) {
        return Some((k.request, MatchKind::Exact));
    }

    let mut candidates = keyed
        .iter()
        .filter(|k| contains_either(&k.home, &home) && contains_either(&k.away, &away));
    let first = candidates.next()?;
    if let Some(second) = candidates.next() {
        warn!(
            home = %prediction.home_team,
            away = %prediction.away_team,
            first = %first.request,
            second = %second.request,
            "Ambiguous containment match, leaving prediction unmatched"
        );
        return None;
    }
    Some((first.request, MatchKind::Contained))
}

/// Odds from the enriched entry for the same fixture, if its context has any.
fn odds_for(request: &FixtureRequest, enriched: &[EnrichedFixture]) -> Option<OddsTriple> {
    let home = match_key(&request.home_team);
    let away = match_key(&request.away_team);
    enriched
        .iter()
        .find(|e| {
            e.request.sport == request.sport
                && match_key(&e.request.home_team) == home
                && match_key(&e.request.away_team) == away
        })
        .and_then(|e| e.context.as_ref())
        .and_then(|ctx| ctx.details.odds.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
