//! Provider JSON → typed values.
//!
//! The football API and the per-sport "games" APIs nest the same facts
//! under different paths (`fixture.id` vs `id`, `goals.home` vs
//! `scores.home.total`, `rank/all` vs `position/games`). All of that
//! shape-sniffing lives here so the engine only sees typed values.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{FixtureId, MatchMeta, MatchSummary, OddsTriple, StandingRow, TeamId};

/// Bet id the provider uses for the 1X2 "Match Winner" market.
const MATCH_WINNER_BET_ID: u64 = 1;

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// First path that resolves to a non-null value.
fn pick<'a>(entry: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let mut current = entry;
        for key in path.iter() {
            current = current.get(*key)?;
        }
        (!current.is_null()).then_some(current)
    })
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn pick_u32(entry: &Value, paths: &[&[&str]]) -> Option<u32> {
    pick(entry, paths)
        .and_then(as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn pick_i64(entry: &Value, paths: &[&[&str]]) -> Option<i64> {
    pick(entry, paths).and_then(as_i64)
}

fn pick_text(entry: &Value, paths: &[&[&str]]) -> Option<String> {
    pick(entry, paths).and_then(as_text)
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Team id from a `/teams` search result entry (`team.id` or `id`).
pub fn team_id(entry: &Value) -> Option<TeamId> {
    pick_u32(entry, &[&["team", "id"], &["id"]])
}

/// Id of the first team in a search response.
pub fn first_team_id(response: &Value) -> Option<TeamId> {
    response.as_array()?.first().and_then(team_id)
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Score for one side: football `goals.home`, games `scores.home` as a
/// number or as `{ total }`.
fn side_score(entry: &Value, side: &str) -> Option<i64> {
    if let Some(goals) = pick_i64(entry, &[&["goals", side]]) {
        return Some(goals);
    }
    let scores = pick(entry, &[&["scores", side]])?;
    match scores {
        Value::Object(_) => scores.get("total").and_then(as_i64),
        other => as_i64(other),
    }
}

pub fn match_summary(entry: &Value) -> MatchSummary {
    MatchSummary {
        fixture_id: fixture_id(entry),
        kickoff: pick(entry, &[&["fixture", "date"], &["date"]]).and_then(as_datetime),
        league: pick_text(entry, &[&["league", "name"]]),
        home_team: pick_text(entry, &[&["teams", "home", "name"]]),
        away_team: pick_text(entry, &[&["teams", "away", "name"]]),
        home_score: side_score(entry, "home"),
        away_score: side_score(entry, "away"),
        status: pick_text(entry, &[&["fixture", "status", "short"], &["status", "short"]]),
    }
}

/// Every entry of a fixtures/games response, in provider order.
pub fn match_summaries(response: &Value) -> Vec<MatchSummary> {
    response
        .as_array()
        .map(|entries| entries.iter().map(match_summary).collect())
        .unwrap_or_default()
}

pub fn fixture_id(entry: &Value) -> Option<FixtureId> {
    pick(entry, &[&["fixture", "id"], &["id"]]).and_then(as_u64)
}

/// The next scheduled meeting, as far as the engine needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingFixture {
    pub fixture_id: Option<FixtureId>,
    pub meta: MatchMeta,
    pub league_id: Option<u32>,
    pub season: Option<String>,
}

/// First entry of a `next=1` response.
pub fn upcoming_fixture(response: &Value) -> Option<UpcomingFixture> {
    let entry = response.as_array()?.first()?;
    Some(UpcomingFixture {
        fixture_id: fixture_id(entry),
        meta: MatchMeta {
            date: pick(entry, &[&["fixture", "date"], &["date"]]).and_then(as_datetime),
            league: pick_text(entry, &[&["league", "name"]]),
            round: pick_text(entry, &[&["league", "round"], &["week"]]),
            venue: pick_text(entry, &[&["fixture", "venue", "name"], &["venue", "name"]]),
        },
        league_id: pick_u32(entry, &[&["league", "id"]]),
        season: pick_text(entry, &[&["league", "season"]]),
    })
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn standing_row(entry: &Value) -> StandingRow {
    // Games APIs put points-for/against under `points`, football a plain total.
    let points = entry.get("points").filter(|p| !p.is_object()).and_then(as_i64);
    StandingRow {
        rank: pick_u32(entry, &[&["rank"], &["position"]]),
        team_id: pick_u32(entry, &[&["team", "id"]]),
        team_name: pick_text(entry, &[&["team", "name"]]),
        group: pick_text(entry, &[&["group", "name"], &["group"]]),
        points,
        played: pick_u32(entry, &[&["all", "played"], &["games", "played"]]),
        won: pick_u32(entry, &[&["all", "win"], &["games", "win", "total"]]),
        drawn: pick_u32(entry, &[&["all", "draw"], &["games", "draw", "total"]]),
        lost: pick_u32(entry, &[&["all", "lose"], &["games", "lose", "total"]]),
        scored: pick_i64(entry, &[&["all", "goals", "for"], &["points", "for"], &["goals", "for"]]),
        conceded: pick_i64(
            entry,
            &[&["all", "goals", "against"], &["points", "against"], &["goals", "against"]],
        ),
        form: pick_text(entry, &[&["form"]]),
    }
}

fn collect_rows(value: &Value, rows: &mut Vec<StandingRow>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_rows(item, rows)),
        Value::Object(map) if map.contains_key("team") => rows.push(standing_row(value)),
        _ => {}
    }
}

/// League table rows from a `/standings` response, groups flattened in order.
/// `None` when the response holds no rows.
pub fn standings(response: &Value) -> Option<Vec<StandingRow>> {
    let table = response
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|first| pick(first, &[&["league", "standings"]]))
        .unwrap_or(response);

    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    (!rows.is_empty()).then_some(rows)
}

// ---------------------------------------------------------------------------
// Odds
// ---------------------------------------------------------------------------

fn is_match_winner(bet: &Value) -> bool {
    bet.get("id").and_then(as_u64) == Some(MATCH_WINNER_BET_ID)
        || bet
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| name.eq_ignore_ascii_case("match winner"))
}

fn bets(bookmaker: &Value) -> &[Value] {
    bookmaker
        .get("bets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Home/draw/away prices out of a market's `values` list.
/// Home and away are required; a missing draw line becomes `"-"`.
pub fn triple_from_values(values: &Value) -> Option<OddsTriple> {
    let entries = values.as_array()?;
    let price = |labels: &[&str]| {
        entries.iter().find_map(|v| {
            let label = v.get("value").and_then(as_text)?;
            if labels.iter().any(|l| l.eq_ignore_ascii_case(label.trim())) {
                v.get("odd").and_then(as_text)
            } else {
                None
            }
        })
    };

    Some(OddsTriple {
        home: price(&["Home", "1"])?,
        draw: price(&["Draw", "X"]).unwrap_or_else(|| "-".to_string()),
        away: price(&["Away", "2"])?,
    })
}

fn market_triple(bet: &Value) -> Option<OddsTriple> {
    bet.get("values").and_then(triple_from_values)
}

/// Odds triple from an `/odds` response: the first usable match-winner
/// market across bookmakers, else the first usable first market of a
/// bookmaker.
pub fn odds_triple(response: &Value) -> Option<OddsTriple> {
    let bookmakers = response
        .as_array()?
        .first()?
        .get("bookmakers")?
        .as_array()?;

    bookmakers
        .iter()
        .flat_map(bets)
        .filter(|bet| is_match_winner(bet))
        .find_map(market_triple)
        .or_else(|| {
            bookmakers
                .iter()
                .filter_map(|b| bets(b).first())
                .find_map(market_triple)
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
