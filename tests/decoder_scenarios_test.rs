use anyhow::Result;
use fantasy_treasurer::core::decode::{
    decode_leagues, decode_standings, decode_teams, decode_weekly_scores,
};
use fantasy_treasurer::core::earnings::{aggregate_season, PrizeSchedule, SeasonLabel};
use fantasy_treasurer::core::ranking::rank;
use fantasy_treasurer::core::{EnvelopeSource, Query};
use fantasy_treasurer::{LocalStorage, SnapshotSource, Treasurer};
use serde_json::{json, Value};
use tempfile::TempDir;

fn scoreboard(teams: &[(&str, f64)]) -> Value {
    let teams: Vec<Value> = teams
        .iter()
        .map(|(name, points)| {
            json!({"team": [
                [{"team_key": format!("449.l.7.t.{}", name)}, {"name": name}],
                {"team_points": {"coverage_type": "week", "total": points.to_string()}}
            ]})
        })
        .collect();
    json!({"fantasy_content": {"league": [
        {"league_key": "449.l.7"},
        {"scoreboard": {"0": {"matchups": {
            "0": {"matchup": {"0": {"teams": teams}}},
            "count": 1
        }}}}
    ]}})
}

/// 測試 teams 為帶 count 的字典時，依序取回且排除 count
#[test]
fn test_teams_dict_with_count() -> Result<()> {
    let envelope = json!({
        "fantasy_content": {"league": [
            {"league_key": "449.l.7"},
            {"teams": {
                "0": {"team": [[
                    {"team_key": "449.l.7.t.1"},
                    {"team_id": "1"},
                    {"name": "TeamA"},
                    {"managers": [{"manager": {"nickname": "Ann"}}]}
                ]]},
                "1": {"team": [[
                    {"team_key": "449.l.7.t.2"},
                    {"team_id": "2"},
                    {"name": "TeamB"},
                    {"managers": [{"manager": {"nickname": "Ben"}}]}
                ]]},
                "count": 2
            }}
        ]}
    });

    let teams = decode_teams(Some(&envelope));
    let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["TeamA", "TeamB"]);
    assert_eq!(teams[0].manager, "Ann");
    assert_eq!(teams[1].team_key, "449.l.7.t.2");
    Ok(())
}

/// 測試連勝紀錄的顯示格式
#[test]
fn test_standing_streak_rendering() -> Result<()> {
    let envelope = json!({
        "fantasy_content": {"league": [
            {"league_key": "449.l.7"},
            {"standings": [{"teams": {
                "0": {"team": [
                    [{"team_key": "449.l.7.t.1"}, {"name": "TeamA"}],
                    {"team_standings": {
                        "rank": "1",
                        "outcome_totals": {"wins": "9", "losses": "4", "ties": "0"},
                        "streak": {"type": "win", "value": "4"},
                        "points_for": "1520.4",
                        "points_against": "1388.1"
                    }}
                ]},
                "count": 1
            }}]}
        ]}
    });

    let standings = decode_standings(Some(&envelope));
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].streak, "W4");
    assert_eq!(standings[0].wins, 9);
    assert!((standings[0].points_for - 1520.4).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_two_week_prize_aggregation() -> Result<()> {
    let week1 = rank(
        1,
        &decode_weekly_scores(
            Some(&scoreboard(&[("TeamC", 80.0), ("TeamA", 120.0), ("TeamB", 100.0)])),
            1,
        ),
    );
    let week2 = rank(
        2,
        &decode_weekly_scores(
            Some(&scoreboard(&[("TeamA", 95.0), ("TeamB", 131.5), ("TeamC", 60.0)])),
            2,
        ),
    );
    let label = SeasonLabel {
        season: 2024,
        league_name: "x-lte".to_string(),
        league_key: "449.l.7".to_string(),
    };

    let season = aggregate_season(
        label,
        &[week1, week2],
        &PrizeSchedule::new(100.0, 50.0, 25.0),
        2,
    );

    assert_eq!(season.total_for("TeamA"), 150.0);
    assert_eq!(season.total_for("TeamB"), 150.0);
    // 第三名每週都有獎金
    assert_eq!(season.total_for("TeamC"), 50.0);
    assert_eq!(season.total_paid_out(), 350.0);
    Ok(())
}

/// 測試 scoreboard 缺漏時回傳空結果，且該週不影響獎金
#[tokio::test]
async fn test_malformed_week_contributes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("scoreboard_449.l.7_week_1.json"),
        serde_json::to_vec(&scoreboard(&[("TeamA", 110.0), ("TeamB", 90.0)]))?,
    )?;
    std::fs::write(
        temp_dir.path().join("scoreboard_449.l.7_week_2.json"),
        serde_json::to_vec(&json!({"fantasy_content": {"league": [{"league_key": "449.l.7"}]}}))?,
    )?;

    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let treasurer = Treasurer::new(SnapshotSource::new(storage));

    assert!(treasurer.weekly_scores("449.l.7", 2).await.is_empty());

    let rankings = treasurer.weekly_rankings("449.l.7", 2).await;
    let season = aggregate_season(
        SeasonLabel {
            season: 2024,
            league_name: "x-lte".to_string(),
            league_key: "449.l.7".to_string(),
        },
        &rankings,
        &PrizeSchedule::new(100.0, 50.0, 25.0),
        2,
    );
    assert_eq!(season.total_for("TeamA"), 100.0);
    assert_eq!(season.total_for("TeamB"), 50.0);
    let team_a = season.teams.iter().find(|t| t.team_name == "TeamA").unwrap();
    assert_eq!(team_a.by_week.get(&2).copied().unwrap_or(0.0), 0.0);
    Ok(())
}

/// 測試其中一場對戰的 teams 不是集合時，只略過該場對戰
#[test]
fn test_unavailable_matchup_keeps_other_scores() -> Result<()> {
    let envelope = json!({
        "fantasy_content": {"league": [
            {"league_key": "449.l.7"},
            {"scoreboard": {"0": {"matchups": {
                "0": {"matchup": {"0": {"teams": "unavailable"}}},
                "1": {"matchup": {"0": {"teams": {
                    "0": {"team": [[{"name": "TeamA"}], {"team_points": {"total": "112.4"}}]},
                    "1": {"team": [[{"name": "TeamB"}], {"team_points": {"total": "97.0"}}]},
                    "count": 2
                }}}},
                "count": 2
            }}}}
        ]}
    });

    let scores = decode_weekly_scores(Some(&envelope), 6);
    assert_eq!(scores.len(), 2);
    let ranking = rank(6, &scores);
    assert_eq!(ranking.entries[0].team_name, "TeamA");
    assert_eq!(ranking.entries[1].team_name, "TeamB");
    Ok(())
}

/// 測試某個 game 的 leagues 為純量時，其他 game 的聯盟仍被找到
#[test]
fn test_scalar_leagues_in_one_game() -> Result<()> {
    let envelope = json!({
        "fantasy_content": {"users": {"0": {"user": [
            {"guid": "GUID"},
            {"games": {
                "0": {"game": [{"game_key": "423"}, {"leagues": 0}]},
                "1": {"game": [
                    {"game_key": "449"},
                    {"leagues": {
                        "0": {"league": [{"league_key": "449.l.7", "name": "x-lte", "num_teams": "10"}]},
                        "count": 1
                    }}
                ]},
                "count": 2
            }}
        ]}, "count": 1}}
    });

    let leagues = decode_leagues(Some(&envelope), 2024);
    assert_eq!(leagues.len(), 1);
    assert_eq!(leagues[0].name, "x-lte");
    assert_eq!(leagues[0].num_teams, 10);
    assert_eq!(leagues[0].season, 2024);
    Ok(())
}

#[test]
fn test_decoding_is_repeatable() -> Result<()> {
    let envelope = scoreboard(&[("TeamA", 101.25), ("TeamB", 99.0)]);
    let first = decode_weekly_scores(Some(&envelope), 5);
    let second = decode_weekly_scores(Some(&envelope), 5);
    assert_eq!(first, second);
    assert_eq!(first[0].week, 5);
    Ok(())
}

#[test]
fn test_snapshot_fetch_blocking() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("scoreboard_449.l.7_week_3.json"),
        serde_json::to_vec(&scoreboard(&[("TeamA", 1.0)]))?,
    )?;
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let treasurer = Treasurer::new(SnapshotSource::new(storage));

    let scores = tokio_test::block_on(treasurer.weekly_scores("449.l.7", 3));
    assert_eq!(scores.len(), 1);

    let query = Query::Scoreboard {
        league_key: "449.l.7".to_string(),
        week: 4,
    };
    assert!(tokio_test::block_on(treasurer.source().fetch(&query))?.is_none());
    Ok(())
}
