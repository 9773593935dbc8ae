//! Shared types for MatchInsight.
//!
//! These types form the data model used across the resolver, the
//! provider transport and the engine. Everything that crosses the
//! boundary to the reasoning step is `Serialize` with camelCase keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider-side numeric team identifier.
pub type TeamId = u32;

/// Provider-side numeric fixture/game identifier.
pub type FixtureId = u64;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

/// Sports covered by the statistics provider. Each one lives on its own host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
    Baseball,
    Volleyball,
    Hockey,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Football,
        Sport::Basketball,
        Sport::Baseball,
        Sport::Volleyball,
        Sport::Hockey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
            Sport::Baseball => "baseball",
            Sport::Volleyball => "volleyball",
            Sport::Hockey => "hockey",
        }
    }

    /// API host serving this sport.
    pub fn host(&self) -> &'static str {
        match self {
            Sport::Football => "v3.football.api-sports.io",
            Sport::Basketball => "v1.basketball.api-sports.io",
            Sport::Baseball => "v1.baseball.api-sports.io",
            Sport::Volleyball => "v1.volleyball.api-sports.io",
            Sport::Hockey => "v1.hockey.api-sports.io",
        }
    }

    /// Path segment listing matches: football calls them fixtures, the rest games.
    pub fn match_endpoint(&self) -> &'static str {
        match self {
            Sport::Football => "fixtures",
            _ => "games",
        }
    }

    /// Whether per-match advanced statistics (xG class metrics) exist.
    pub fn has_advanced_stats(&self) -> bool {
        matches!(self, Sport::Football)
    }

    /// Whether lineups, odds and injuries can be fetched per fixture.
    pub fn has_fixture_details(&self) -> bool {
        matches!(self, Sport::Football)
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Sport::ALL
            .iter()
            .copied()
            .find(|sport| sport.as_str() == wanted)
            .ok_or_else(|| InsightError::Config(format!("unknown sport: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A team name as supplied by the caller, with its provider id once known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub name: String,
    pub sport: Sport,
    pub provider_id: Option<TeamId>,
}

impl TeamRef {
    pub fn is_resolved(&self) -> bool {
        self.provider_id.is_some()
    }
}

/// Bet market type a fixture is analysed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    General,
    Handicap,
    UnOver,
    /// Reasoning step picks the best type per match.
    Mixed,
}

/// One fixture the caller wants analysed. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRequest {
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    /// Display alias shown to the user instead of the provider-facing name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
    /// Fixed handicap line or over/under threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_rates: Option<String>,
}

impl FixtureRequest {
    pub fn new(sport: Sport, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            sport,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_team_ko: None,
            away_team_ko: None,
            game_type: None,
            criteria: None,
            vote_rates: None,
        }
    }
}

impl fmt::Display for FixtureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} vs {}", self.sport, self.home_team, self.away_team)
    }
}

// ---------------------------------------------------------------------------
// Match context
// ---------------------------------------------------------------------------

/// A completed or scheduled match, normalized from either provider shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub fixture_id: Option<FixtureId>,
    pub kickoff: Option<DateTime<Utc>>,
    pub league: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    /// Provider short status, e.g. "FT".
    pub status: Option<String>,
}

/// One row of a league table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: Option<u32>,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
    pub group: Option<String>,
    pub points: Option<i64>,
    pub played: Option<u32>,
    pub won: Option<u32>,
    pub drawn: Option<u32>,
    pub lost: Option<u32>,
    /// Goals (or points) scored.
    pub scored: Option<i64>,
    /// Goals (or points) conceded.
    pub conceded: Option<i64>,
    pub form: Option<String>,
}

/// Metadata of the upcoming fixture between the two teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMeta {
    pub date: Option<DateTime<Utc>>,
    pub league: Option<String>,
    pub round: Option<String>,
    pub venue: Option<String>,
}

/// Match-winner prices. Either fully present or absent, never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsTriple {
    pub home: String,
    /// `"-"` when the market has no draw line.
    pub draw: String,
    pub away: String,
}

impl fmt::Display for OddsTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.home, self.draw, self.away)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub lineups: Option<serde_json::Value>,
    pub odds: Option<OddsTriple>,
    pub injuries: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    pub name: String,
    pub id: TeamId,
    pub recent_matches: Option<Vec<MatchSummary>>,
    pub last_match_advanced_stats: Option<serde_json::Value>,
}

impl TeamSnapshot {
    pub fn new(name: impl Into<String>, id: TeamId) -> Self {
        Self {
            name: name.into(),
            id,
            recent_matches: None,
            last_match_advanced_stats: None,
        }
    }
}

/// Everything known about one fixture. `None` fields were denied or
/// unavailable upstream; that is an expected terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchContext {
    pub sport: Sport,
    pub meta: Option<MatchMeta>,
    pub home: TeamSnapshot,
    pub away: TeamSnapshot,
    pub head_to_head: Option<Vec<MatchSummary>>,
    pub standings: Option<Vec<StandingRow>>,
    pub details: MatchDetails,
}

impl MatchContext {
    /// An identified fixture with nothing enriched yet.
    pub fn bare(sport: Sport, home: TeamSnapshot, away: TeamSnapshot) -> Self {
        Self {
            sport,
            meta: None,
            home,
            away,
            head_to_head: None,
            standings: None,
            details: MatchDetails::default(),
        }
    }

    /// Names of the optional fields that came back empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("meta", self.meta.is_none()),
            ("home.recentMatches", self.home.recent_matches.is_none()),
            ("home.lastMatchAdvancedStats", self.home.last_match_advanced_stats.is_none()),
            ("away.recentMatches", self.away.recent_matches.is_none()),
            ("away.lastMatchAdvancedStats", self.away.last_match_advanced_stats.is_none()),
            ("headToHead", self.head_to_head.is_none()),
            ("standings", self.standings.is_none()),
            ("details.lineups", self.details.lineups.is_none()),
            ("details.odds", self.details.odds.is_none()),
            ("details.injuries", self.details.injuries.is_none()),
        ];
        checks
            .iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// A request paired with its context for the duration of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFixture {
    pub request: FixtureRequest,
    /// `None` when aggregation failed for this item.
    pub context: Option<MatchContext>,
}

impl EnrichedFixture {
    pub fn is_enriched(&self) -> bool {
        self.context.is_some()
    }
}

// ---------------------------------------------------------------------------
// Reasoning output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyStatus {
    Axis,
    Trap,
    Eraser,
    None,
}

/// Why a pick would most likely lose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskType {
    /// Missing information (injuries, rotation, weather).
    #[serde(rename = "TYPE-A")]
    MissingInformation,
    /// Motivation issues.
    #[serde(rename = "TYPE-B")]
    Motivation,
    /// Market distortion or odds trap.
    #[serde(rename = "TYPE-C")]
    MarketDistortion,
    /// Tactical mismatch or jinx.
    #[serde(rename = "TYPE-D")]
    Matchup,
}

/// One prediction record as returned by the reasoning step.
/// Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub prediction: String,
    pub confidence: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_stake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<GameType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_status: Option<StrategyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_type: Option<RiskType>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A prediction joined back onto its originating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledPrediction {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub home_team_ko: String,
    pub away_team_ko: String,
    /// Always taken from the match context, never from the reasoning output.
    pub odds: Option<OddsTriple>,
    /// Whether an originating request was found.
    pub matched: bool,
}

/// A multi-fixture ticket proposed by the reasoning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination<P> {
    pub rank: u32,
    pub total_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<String>,
    pub matches: Vec<P>,
}

/// Full structured output of a batch reasoning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "P: Deserialize<'de>"))]
pub struct BatchAnalysis<P = Prediction> {
    #[serde(default)]
    pub matches: Vec<P>,
    #[serde(default)]
    pub recommended_combinations: Vec<Combination<P>>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for MatchInsight.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("Team not found ({sport}): {name}")]
    TeamNotFound { sport: Sport, name: String },

    #[error("Rate limited on {endpoint} after {attempts} attempts")]
    RateLimited { endpoint: String, attempts: u32 },

    #[error("Provider error on {endpoint} (status {status:?}): {message}")]
    Provider {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Plan restriction on {endpoint}: {message}")]
    PlanRestricted { endpoint: String, message: String },

    #[error("Network error on {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InsightError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InsightError::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
