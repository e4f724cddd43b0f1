use super::{collection_at, run_decoder, ROOT_KEY};
use crate::core::node::{Node, ShapeError};
use crate::domain::model::League;
use serde_json::Value;

const UNKNOWN_LEAGUE: &str = "Unknown";

fn league_from(info: &Node, season: i32) -> League {
    let text = |key: &str| info.get(key).and_then(Node::as_text).unwrap_or_default();
    League {
        // 只有缺少 name 欄位時才用預設名稱，空字串照原樣保留
        name: info
            .get("name")
            .map(|name| name.as_text().unwrap_or_default())
            .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string()),
        league_id: text("league_id"),
        league_key: text("league_key"),
        num_teams: info.get("num_teams").map(Node::to_int_or_zero).unwrap_or(0),
        current_week: info.get("current_week").and_then(Node::as_int),
        season,
    }
}

/// `users.0.user` 底下的使用者區塊；有些回應省略 `user`，區塊清單直接放在索引 0
fn user_blocks(root: &Node) -> Vec<&Node> {
    let Some(first) = root.path(&[ROOT_KEY, "users", "0"]) else {
        return Vec::new();
    };
    match first.get("user") {
        Some(user) => user.one_or_many(),
        None if matches!(first, Node::Array(_)) => first.items(),
        None => Vec::new(),
    }
}

fn decode_into(root: &Node, season: i32, out: &mut Vec<League>) -> Result<(), ShapeError> {
    for block in user_blocks(root) {
        let Some(games) = block.get("games") else {
            continue;
        };
        for game_entry in collection_at(Some(games), "user.games") {
            let Some(game) = game_entry.get("game") else {
                continue;
            };
            for game_block in game.one_or_many() {
                let Some(leagues) = game_block.get("leagues") else {
                    continue;
                };
                for league_entry in collection_at(Some(leagues), "game.leagues") {
                    let Some(league) = league_entry.get("league") else {
                        continue;
                    };
                    // 只有第一個區塊帶有聯盟資訊
                    if let Some(info) = league.one_or_many().first().filter(|n| n.is_object()) {
                        out.push(league_from(info, season));
                    }
                }
            }
        }
    }
    Ok(())
}

/// 使用者在單一賽季參加的聯盟，每筆都標上 `season`
pub fn decode_leagues(envelope: Option<&Value>, season: i32) -> Vec<League> {
    run_decoder("leagues", envelope, |root, out| decode_into(root, season, out))
}

/// 從聯盟資訊 envelope 取得 `current_week`
pub fn decode_current_week(envelope: Option<&Value>) -> Option<i64> {
    let root = Node::from_envelope(envelope);
    let league = root.path(&[ROOT_KEY, "league"])?;
    let info = match league {
        Node::Object(_) => league,
        Node::Array(items) => items.first()?,
        _ => return None,
    };
    info.get("current_week").and_then(Node::as_int)
}
