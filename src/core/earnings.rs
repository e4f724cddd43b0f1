//! 獎金計算：每週前三名的隊伍獎金，以及跨賽季的 owner 收入

use crate::domain::model::{OwnerEarnings, SeasonEarnings, Team, TeamEarnings, WeeklyRanking};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 每週第 1、2、3 名的獎金；第 4 名以後沒有獎金
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrizeSchedule {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl PrizeSchedule {
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn prize_for_rank(&self, rank: u32) -> f64 {
        match rank {
            1 => self.first,
            2 => self.second,
            3 => self.third,
            _ => 0.0,
        }
    }
}

/// 賽季獎金所屬的聯盟
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonLabel {
    pub season: i32,
    pub league_name: String,
    pub league_key: String,
}

/// 發放第 1 週到第 `weeks` 週的前三名獎金，依隊名加總
///
/// 範圍外的週次忽略，空排名不增加任何金額。出現在計入排名中的隊伍都會列出，
/// 總額為 0 也一樣。
pub fn aggregate_season(
    label: SeasonLabel,
    rankings: &[WeeklyRanking],
    schedule: &PrizeSchedule,
    weeks: u32,
) -> SeasonEarnings {
    let mut by_team: BTreeMap<String, TeamEarnings> = BTreeMap::new();

    for ranking in rankings.iter().filter(|r| (1..=weeks).contains(&r.week)) {
        for entry in &ranking.entries {
            let team = by_team
                .entry(entry.team_name.clone())
                .or_insert_with(|| TeamEarnings {
                    team_name: entry.team_name.clone(),
                    by_week: BTreeMap::new(),
                    total: 0.0,
                });
            let prize = schedule.prize_for_rank(entry.rank);
            if prize > 0.0 {
                *team.by_week.entry(ranking.week).or_insert(0.0) += prize;
                team.total += prize;
            }
        }
    }

    SeasonEarnings {
        season: label.season,
        league_name: label.league_name,
        league_key: label.league_key,
        weeks,
        teams: by_team.into_values().collect(),
    }
}

/// 單一賽季隊伍的 owner：manager 暱稱，沒有 manager 時使用隊名
pub fn owner_of(team: &Team) -> &str {
    if team.manager.is_empty() {
        &team.name
    } else {
        &team.manager
    }
}

/// 單一賽季的隊名 → owner 對照
pub fn owner_map(teams: &[Team]) -> HashMap<String, String> {
    let mut owners = HashMap::new();
    for team in teams {
        owners
            .entry(team.name.clone())
            .or_insert_with(|| owner_of(team).to_string());
    }
    owners
}

/// 依 owner 累計的獎金，並保留每個賽季的明細
#[derive(Debug, Clone, Default)]
pub struct OwnerLedger {
    owners: BTreeMap<String, BTreeMap<i32, f64>>,
}

impl OwnerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, owner: &str, year: i32, amount: f64) {
        *self
            .owners
            .entry(owner.to_string())
            .or_default()
            .entry(year)
            .or_insert(0.0) += amount;
    }

    /// 併入單一賽季的隊伍獎金，只使用該賽季的 owner 對照；
    /// 對照中找不到的隊伍以隊名作為 owner
    pub fn add_season(&mut self, season: &SeasonEarnings, owners: &HashMap<String, String>) {
        for team in &season.teams {
            let owner = owners
                .get(&team.team_name)
                .map(String::as_str)
                .unwrap_or(&team.team_name);
            self.add(owner, season.season, team.total);
        }
    }

    pub fn total_for(&self, owner: &str) -> f64 {
        self.owners
            .get(owner)
            .map(|years| years.values().sum())
            .unwrap_or(0.0)
    }

    /// 總額由高到低，相同時依 owner 名稱排序
    pub fn into_earnings(self) -> Vec<OwnerEarnings> {
        let mut earnings: Vec<OwnerEarnings> = self
            .owners
            .into_iter()
            .map(|(owner, by_year)| OwnerEarnings {
                total: by_year.values().sum(),
                owner,
                by_year,
            })
            .collect();
        earnings.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.owner.cmp(&b.owner))
        });
        earnings
    }
}

/// 單一賽季計算獎金所需的資料
#[derive(Debug, Clone)]
pub struct SeasonData {
    pub label: SeasonLabel,
    pub weeks: u32,
    pub teams: Vec<Team>,
    pub rankings: Vec<WeeklyRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub schedule: PrizeSchedule,
    pub seasons: Vec<SeasonEarnings>,
    pub owners: Vec<OwnerEarnings>,
}

/// 先算各賽季的隊伍獎金，再以各賽季自己的隊名 → owner 對照累計
pub fn summarize(seasons: &[SeasonData], schedule: &PrizeSchedule) -> EarningsSummary {
    let mut ledger = OwnerLedger::new();
    let mut season_earnings = Vec::with_capacity(seasons.len());

    for data in seasons {
        let earnings = aggregate_season(data.label.clone(), &data.rankings, schedule, data.weeks);
        ledger.add_season(&earnings, &owner_map(&data.teams));
        season_earnings.push(earnings);
    }

    EarningsSummary {
        schedule: *schedule,
        seasons: season_earnings,
        owners: ledger.into_earnings(),
    }
}
