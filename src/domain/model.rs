use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    pub league_id: String,
    pub league_key: String,
    pub num_teams: i64,
    pub current_week: Option<i64>,
    pub season: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub team_key: String,
    pub team_id: String,
    pub manager: String,
    pub logo_url: String,
    pub waiver_priority: i64,
    pub moves: i64,
    pub trades: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub team_key: String,
    pub rank: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub points_for: f64,
    pub points_against: f64,
    pub streak: String,
    pub manager: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub player_key: String,
    pub position: String,
    /// NFL team abbreviation, upper-cased.
    pub team: String,
    pub status: String,
    pub selected_position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub team_name: String,
    pub week: u32,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    pub rank: u32,
    pub team_name: String,
    pub points: f64,
}

/// One week's scores, best first. Every rank 1..N appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRanking {
    pub week: u32,
    pub entries: Vec<RankedScore>,
}

impl WeeklyRanking {
    pub fn top_n(&self, n: usize) -> &[RankedScore] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScorer {
    pub team_name: String,
    pub total_points: f64,
    pub weeks_played: u32,
    pub average_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEarnings {
    pub team_name: String,
    pub by_week: BTreeMap<u32, f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEarnings {
    pub season: i32,
    pub league_name: String,
    pub league_key: String,
    pub weeks: u32,
    /// Ordered by team name.
    pub teams: Vec<TeamEarnings>,
}

impl SeasonEarnings {
    pub fn total_for(&self, team_name: &str) -> f64 {
        self.teams
            .iter()
            .find(|t| t.team_name == team_name)
            .map(|t| t.total)
            .unwrap_or(0.0)
    }

    pub fn total_paid_out(&self) -> f64 {
        self.teams.iter().map(|t| t.total).sum()
    }

    /// Highest total first; equal totals by team name.
    pub fn leaderboard(&self) -> Vec<&TeamEarnings> {
        let mut board: Vec<&TeamEarnings> = self.teams.iter().collect();
        board.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.team_name.cmp(&b.team_name))
        });
        board
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerEarnings {
    pub owner: String,
    pub total: f64,
    pub by_year: BTreeMap<i32, f64>,
}
