//! 聯盟搜尋輔助：賽季對應的 game key，以及聯盟名稱比對

use crate::domain::model::League;
use std::collections::{BTreeMap, HashMap};

/// 通用 game 代碼，API 會對應到當季 NFL
pub const DEFAULT_GAME_KEY: &str = "nfl";

const KNOWN_GAME_KEYS: &[(i32, &str)] = &[(2023, "423"), (2024, "449"), (2025, "453")];

/// 取得賽季的 game key；設定檔覆寫優先於內建對照表
pub fn game_key_for_season(season: i32, overrides: &HashMap<i32, String>) -> String {
    if let Some(key) = overrides.get(&season) {
        return key.clone();
    }
    KNOWN_GAME_KEYS
        .iter()
        .find(|(year, _)| *year == season)
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| DEFAULT_GAME_KEY.to_string())
}

/// 聯盟名稱不分大小寫的子字串比對
pub fn name_matches(league: &League, needle: &str) -> bool {
    league.name.to_lowercase().contains(&needle.to_lowercase())
}

pub fn find_all_by_name<'a>(leagues: &'a [League], needle: &str) -> Vec<&'a League> {
    leagues.iter().filter(|l| name_matches(l, needle)).collect()
}

pub fn find_first_by_name<'a>(leagues: &'a [League], needle: &str) -> Option<&'a League> {
    leagues.iter().find(|l| name_matches(l, needle))
}

/// 依賽季分組，只列出有聯盟的賽季，由舊到新
pub fn group_by_season(leagues: Vec<League>) -> BTreeMap<i32, Vec<League>> {
    let mut grouped: BTreeMap<i32, Vec<League>> = BTreeMap::new();
    for league in leagues {
        grouped.entry(league.season).or_default().push(league);
    }
    grouped
}
