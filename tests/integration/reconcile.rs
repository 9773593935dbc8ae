use serde_json::json;
use std::sync::Arc;

use matchinsight::config::BatchConfig;
use matchinsight::engine::reconciler::AnalysisMode;
use matchinsight::provider::governor::CancelSignal;
use matchinsight::types::{BatchAnalysis, FixtureRequest, GameType, OddsTriple, Prediction, Sport};
use matchinsight::MatchInsight;

use crate::mock_transport::{Reply, ScriptedTransport, VirtualClock};

fn transport_with_odds() -> ScriptedTransport {
    ScriptedTransport::new()
        .route_with(
            "/fixtures/headtohead",
            "next",
            1,
            Reply::Data(json!([{"fixture": {"id": 555}, "league": {"id": 39, "season": 2024}}])),
        )
        .route(
            "/odds",
            Reply::Data(json!([{"bookmakers": [{"bets": [{
                "id": 1,
                "values": [
                    {"value": "Home", "odd": "1.95"},
                    {"value": "Draw", "odd": "3.50"},
                    {"value": "Away", "odd": "4.00"}
                ]
            }]}]}])),
        )
}

#[tokio::test]
async fn test_reasoning_output_round_trip() {
    let transport = Arc::new(transport_with_odds());
    let engine = MatchInsight::new(transport, Arc::new(VirtualClock::new()), &BatchConfig::default());

    let mut request = FixtureRequest::new(Sport::Football, "Manchester United", "Chelsea");
    request.home_team_ko = Some("맨유".into());
    request.away_team_ko = Some("첼시".into());
    request.game_type = Some(GameType::Handicap);
    request.criteria = Some("-1".into());
    let requests = vec![request];

    let enriched = engine
        .enrich_batch(&requests, |_, _| {}, &CancelSignal::never())
        .await
        .unwrap();

    // As the reasoning step would return it: reformatted names, its own odds guess.
    let predictions: Vec<Prediction> = serde_json::from_value(json!([{
        "homeTeam": "manchester  UNITED",
        "awayTeam": "chelsea",
        "prediction": "Home -1",
        "confidence": 64,
        "reason": "Home side unbeaten in five",
        "riskLevel": "MEDIUM",
        "gameType": "General",
        "odds": {"home": "1.10", "draw": "9.00", "away": "15.00"},
        "analystNote": "kept"
    }]))
    .unwrap();

    let out = engine.reconcile(predictions, &requests, &enriched);
    let rec = &out[0];

    assert!(rec.matched);
    assert_eq!(
        rec.odds,
        Some(OddsTriple {
            home: "1.95".into(),
            draw: "3.50".into(),
            away: "4.00".into(),
        })
    );
    assert_eq!(rec.home_team_ko, "맨유");
    assert_eq!(rec.away_team_ko, "첼시");
    assert_eq!(rec.prediction.game_type, Some(GameType::Handicap));
    assert_eq!(rec.prediction.criteria.as_deref(), Some("-1"));
    assert_eq!(rec.prediction.extra.get("analystNote"), Some(&json!("kept")));

    let wire = serde_json::to_value(rec).unwrap();
    assert_eq!(wire["odds"]["home"], "1.95");
    assert_eq!(wire["homeTeamKo"], "맨유");
    assert_eq!(wire["sport"], "football");
}

#[tokio::test]
async fn test_combination_analysis_without_context() {
    let engine = MatchInsight::new(
        Arc::new(ScriptedTransport::new()),
        Arc::new(VirtualClock::new()),
        &BatchConfig::default(),
    );
    let requests = vec![
        FixtureRequest::new(Sport::Basketball, "Los Angeles Lakers", "Boston Celtics"),
        FixtureRequest::new(Sport::Basketball, "Denver Nuggets", "Miami Heat"),
    ];

    let analysis: BatchAnalysis = serde_json::from_value(json!({
        "recommendedCombinations": [{
            "rank": 1,
            "totalReason": "Two home favourites",
            "matches": [
                {"homeTeam": "Lakers", "awayTeam": "Celtics", "prediction": "Over 221.5",
                 "confidence": 70, "reason": "Pace", "gameType": "UnOver", "criteria": "221.5"},
                {"homeTeam": "Denver Nuggets", "awayTeam": "Miami Heat", "prediction": "Home",
                 "confidence": 66, "reason": "Altitude", "gameType": "Mixed"}
            ]
        }]
    }))
    .unwrap();

    let out = engine.reconcile_with_mode(
        analysis,
        AnalysisMode::Combination { target: GameType::Mixed },
        &requests,
        &[],
    );

    assert!(out.matches.is_empty());
    let legs = &out.recommended_combinations[0].matches;
    assert!(legs.iter().all(|leg| leg.matched && leg.odds.is_none()));
    assert_eq!(legs[0].prediction.game_type, Some(GameType::UnOver));
    assert_eq!(legs[0].prediction.criteria.as_deref(), Some("221.5"));
    assert_eq!(legs[1].prediction.game_type, Some(GameType::General));
    assert_eq!(legs[1].prediction.sport.as_deref(), Some("basketball"));
}
