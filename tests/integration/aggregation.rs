use serde_json::json;
use std::sync::Arc;

use matchinsight::config::BatchConfig;
use matchinsight::types::{InsightError, OddsTriple, Sport};
use matchinsight::MatchInsight;

use crate::mock_transport::{Reply, ScriptedTransport, VirtualClock};

const SPURS: u32 = 47;
const ARSENAL: u32 = 42;

fn north_london_derby() -> ScriptedTransport {
    ScriptedTransport::new()
        .route_with(
            "/fixtures",
            "team",
            SPURS,
            Reply::Data(json!([{
                "fixture": {"id": 1001, "date": "2024-09-14T11:30:00+00:00", "status": {"short": "FT"}},
                "league": {"name": "Premier League"},
                "teams": {"home": {"name": "Tottenham"}, "away": {"name": "Brentford"}},
                "goals": {"home": 3, "away": 1}
            }])),
        )
        .route_with(
            "/fixtures/statistics",
            "fixture",
            1001,
            Reply::Data(json!([{"team": {"id": SPURS}, "statistics": [{"type": "Shots on Goal", "value": 8}]}])),
        )
        .route_with(
            "/fixtures/headtohead",
            "last",
            5,
            Reply::Data(json!([{
                "fixture": {"id": 900, "status": {"short": "FT"}},
                "teams": {"home": {"name": "Arsenal"}, "away": {"name": "Tottenham"}},
                "goals": {"home": 2, "away": 2}
            }])),
        )
        .route_with(
            "/fixtures/headtohead",
            "next",
            1,
            Reply::Data(json!([{
                "fixture": {"id": 2002, "date": "2025-01-15T20:00:00+00:00", "venue": {"name": "Tottenham Hotspur Stadium"}},
                "league": {"id": 39, "name": "Premier League", "season": 2024, "round": "Regular Season - 21"},
                "teams": {"home": {"name": "Tottenham"}, "away": {"name": "Arsenal"}}
            }])),
        )
        .route("/fixtures/lineups", Reply::Empty)
        .route(
            "/odds",
            Reply::Data(json!([{"bookmakers": [{"bets": [{
                "id": 1,
                "name": "Match Winner",
                "values": [
                    {"value": "Home", "odd": "2.80"},
                    {"value": "Draw", "odd": "3.60"},
                    {"value": "Away", "odd": "2.40"}
                ]
            }]}]}])),
        )
        .route("/injuries", Reply::Fail(500))
        .route_with(
            "/standings",
            "league",
            39,
            Reply::Data(json!([{"league": {"standings": [[
                {"rank": 1, "team": {"id": ARSENAL, "name": "Arsenal"}, "points": 50,
                 "all": {"played": 20, "win": 15, "draw": 5, "lose": 0, "goals": {"for": 40, "against": 12}}},
                {"rank": 5, "team": {"id": SPURS, "name": "Tottenham"}, "points": 36,
                 "all": {"played": 20, "win": 11, "draw": 3, "lose": 6, "goals": {"for": 38, "against": 27}}}
            ]]}}])),
        )
}

fn engine(transport: Arc<ScriptedTransport>) -> MatchInsight {
    MatchInsight::new(transport, Arc::new(VirtualClock::new()), &BatchConfig::default())
}

#[tokio::test]
async fn test_full_football_context() {
    let transport = Arc::new(north_london_derby());
    let engine = engine(transport.clone());

    let ctx = engine
        .get_match_context(Sport::Football, "Tottenham", "Arsenal")
        .await
        .unwrap();

    assert_eq!(ctx.home.id, SPURS);
    assert_eq!(ctx.away.id, ARSENAL);

    let form = ctx.home.recent_matches.as_ref().unwrap();
    assert_eq!(form[0].fixture_id, Some(1001));
    assert_eq!(form[0].home_score, Some(3));
    assert!(ctx.home.last_match_advanced_stats.is_some());
    assert_eq!(ctx.away.recent_matches.as_deref().map(<[_]>::len), Some(0));
    assert!(ctx.away.last_match_advanced_stats.is_none());

    assert_eq!(ctx.head_to_head.as_ref().map(Vec::len), Some(1));

    let meta = ctx.meta.as_ref().unwrap();
    assert_eq!(meta.venue.as_deref(), Some("Tottenham Hotspur Stadium"));
    assert_eq!(meta.round.as_deref(), Some("Regular Season - 21"));

    let standings = ctx.standings.as_ref().unwrap();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].team_id, Some(ARSENAL));
    assert_eq!(standings[1].scored, Some(38));

    assert_eq!(
        ctx.details.odds,
        Some(OddsTriple {
            home: "2.80".into(),
            draw: "3.60".into(),
            away: "2.40".into(),
        })
    );
    // Plan-restricted lineups and failed injuries only empty their own fields.
    assert!(ctx.details.lineups.is_none());
    assert!(ctx.details.injuries.is_none());
    assert_eq!(
        ctx.missing_fields(),
        vec!["away.lastMatchAdvancedStats", "details.lineups", "details.injuries"]
    );

    // Both teams come from the static table.
    assert_eq!(transport.calls_to("/teams"), 0);
    assert_eq!(transport.calls_to("/fixtures/statistics"), 1);
}

#[tokio::test]
async fn test_unknown_team_is_typed_failure() {
    let transport = Arc::new(ScriptedTransport::new());
    let engine = engine(transport.clone());

    let err = engine
        .get_match_context(Sport::Football, "Atlantis United", "Arsenal")
        .await
        .unwrap_err();

    assert!(matches!(err, InsightError::TeamNotFound { ref name, .. } if name == "Atlantis United"));
    assert_eq!(transport.calls_to("/teams"), 1);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_games_sport_never_calls_football_only_endpoints() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .route_with("/teams", "search", "Boston Bruins", Reply::Data(json!([{"id": 1}])))
            .route_with("/teams", "search", "Toronto Maple Leafs", Reply::Data(json!([{"id": 2}])))
            .route_with(
                "/games",
                "next",
                1,
                Reply::Data(json!([{"id": 77, "league": {"id": 57, "name": "NHL", "season": 2024}}])),
            ),
    );
    let engine = engine(transport.clone());

    let ctx = engine
        .get_match_context(Sport::Hockey, "Boston Bruins", "Toronto Maple Leafs")
        .await
        .unwrap();

    assert_eq!((ctx.home.id, ctx.away.id), (1, 2));
    assert!(ctx.meta.is_some());
    for endpoint in ["/fixtures/statistics", "/fixtures/lineups", "/odds", "/injuries"] {
        assert_eq!(transport.calls_to(endpoint), 0, "{endpoint} called for hockey");
    }
    assert_eq!(transport.calls_to("/standings"), 1);
    assert!(transport
        .calls()
        .iter()
        .all(|c| c.sport == Sport::Hockey));
}
