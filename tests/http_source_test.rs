use anyhow::Result;
use fantasy_treasurer::adapters::source_from_config;
use fantasy_treasurer::{HttpSource, Treasurer, TreasurerConfig, TreasurerError};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn scoreboard_body(teams: &[(&str, &str)]) -> String {
    let teams: Vec<serde_json::Value> = teams
        .iter()
        .map(|(name, points)| json!({"team": [[{"name": name}], {"team_points": {"total": points}}]}))
        .collect();
    json!({"fantasy_content": {"league": [
        {"league_key": "449.l.7"},
        {"scoreboard": {"0": {"matchups": {"0": {"matchup": {"0": {"teams": teams}}}, "count": 1}}}}
    ]}})
    .to_string()
}

fn http_treasurer(server: &MockServer) -> Result<Treasurer<HttpSource>> {
    let source = HttpSource::new(
        server.base_url(),
        "secret-token",
        Duration::from_secs(5),
        Duration::ZERO,
    )?;
    Ok(Treasurer::new(source))
}

/// 測試透過 API 取得每週分數，失敗的週次視為沒有資料
#[tokio::test]
async fn test_top_scorers_over_http() -> Result<()> {
    let server = MockServer::start();
    let week1 = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/league/449.l.7/scoreboard")
            .path_contains("week=1")
            .query_param("format", "json")
            .header("authorization", "Bearer secret-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(scoreboard_body(&[("Alpha", "98.5"), ("Bravo", "131.2"), ("Charlie", "77")]));
    });
    let week2 = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/league/449.l.7/scoreboard")
            .path_contains("week=2");
        then.status(500).body("upstream exploded");
    });

    let report = http_treasurer(&server)?
        .weekly_top_scorers("449.l.7", Some(2), 3)
        .await;

    week1.assert();
    week2.assert();
    assert_eq!(report.weeks.len(), 2);
    assert_eq!(report.weeks[0].entries[0].team_name, "Bravo");
    assert!(report.weeks[1].is_empty());
    assert_eq!(report.summary[0].team_name, "Bravo");
    assert_eq!(report.summary[0].weeks_played, 1);
    Ok(())
}

#[tokio::test]
async fn test_league_discovery_over_http() -> Result<()> {
    let server = MockServer::start();
    let leagues = server.mock(|when, then| {
        when.method(GET).path_contains("game_keys=449");
        then.status(200).json_body(json!({
            "fantasy_content": {"users": {"0": {"user": [
                {"guid": "G"},
                {"games": {"0": {"game": [
                    {"game_key": "449"},
                    {"leagues": {
                        "0": {"league": [{"league_key": "449.l.7", "name": "x-lte", "num_teams": "10"}]},
                        "count": 1
                    }}
                ]}, "count": 1}}
            ]}, "count": 1}}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("game_keys=423");
        then.status(401).body("token expired");
    });

    let treasurer = http_treasurer(&server)?;
    let found = treasurer.find_league_by_name("X-LTE", 2023..=2024).await;

    leagues.assert();
    let league = found.expect("league discovered in 2024");
    assert_eq!(league.league_key, "449.l.7");
    assert_eq!(league.season, 2024);
    assert_eq!(league.num_teams, 10);
    Ok(())
}

#[tokio::test]
async fn test_http_source_from_config() -> Result<()> {
    let server = MockServer::start();
    let standings = server.mock(|when, then| {
        when.method(GET)
            .path("/league/449.l.7/standings")
            .header("authorization", "Bearer cfg-token");
        then.status(200).json_body(json!({"fantasy_content": {"league": [
            {"league_key": "449.l.7"},
            {"standings": [{"teams": {
                "0": {"team": [
                    [{"name": "Alpha"}],
                    {"team_standings": {"rank": 1, "streak": {"type": "loss", "value": "2"}}}
                ]},
                "count": 1
            }}]}
        ]}}));
    });

    let config = TreasurerConfig::from_toml_str(&format!(
        r#"
[source]
type = "http"
base_url = "{}"
access_token = "cfg-token"
request_delay_ms = 0

[load]
output_path = "./output"
output_formats = ["json"]
"#,
        server.base_url()
    ))?;

    let treasurer = Treasurer::new(source_from_config(&config)?);
    let rows = treasurer.league_standings("449.l.7").await;

    standings.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].streak, "L2");
    Ok(())
}

#[test]
fn test_http_source_requires_token() -> Result<()> {
    let config = TreasurerConfig::from_toml_str(
        r#"
[source]
type = "http"

[load]
output_path = "./output"
output_formats = ["json"]
"#,
    )?;

    let err = source_from_config(&config).err().expect("token is required");
    assert!(matches!(
        err,
        TreasurerError::MissingConfigError { ref field } if field == "source.access_token"
    ));
    Ok(())
}
