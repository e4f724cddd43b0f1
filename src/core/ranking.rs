//! 每週排名與賽季得分王統計
//!
//! 同分不共用名次：排序是穩定的，同分時回應中先出現的隊伍名次較前

use crate::domain::model::{RankedScore, TopScorer, WeeklyRanking, WeeklyScore};
use std::cmp::Ordering;

/// 分數由高到低；相等 (含 0.0 與 -0.0) 回傳 Equal，交給穩定排序保留原順序
fn by_points_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// 單週分數排名，分數高者在前
pub fn rank(week: u32, scores: &[WeeklyScore]) -> WeeklyRanking {
    let mut ordered: Vec<&WeeklyScore> = scores.iter().collect();
    ordered.sort_by(|a, b| by_points_desc(a.points, b.points));

    let entries = ordered
        .into_iter()
        .enumerate()
        .map(|(i, score)| RankedScore {
            rank: i as u32 + 1,
            team_name: score.team_name.clone(),
            points: score.points,
        })
        .collect();

    WeeklyRanking { week, entries }
}

/// 賽季前 N 名統計：每支隊伍累計每週進入前 `n` 名時的分數
pub fn season_top_scorers(weeks: &[WeeklyRanking], n: usize) -> Vec<TopScorer> {
    let mut tallies: Vec<(String, f64, u32)> = Vec::new();

    for week in weeks {
        for entry in week.top_n(n) {
            match tallies.iter_mut().find(|(name, _, _)| *name == entry.team_name) {
                Some((_, total, played)) => {
                    *total += entry.points;
                    *played += 1;
                }
                None => tallies.push((entry.team_name.clone(), entry.points, 1)),
            }
        }
    }

    let mut scorers: Vec<TopScorer> = tallies
        .into_iter()
        .map(|(team_name, total_points, weeks_played)| TopScorer {
            team_name,
            total_points,
            weeks_played,
            average_points: if weeks_played > 0 {
                total_points / weeks_played as f64
            } else {
                0.0
            },
        })
        .collect();
    scorers.sort_by(|a, b| by_points_desc(a.total_points, b.total_points));
    scorers
}
