use super::{collection_at, root_blocks, run_decoder};
use crate::core::builder::Slot;
use crate::core::node::{entity_fields, Node, ShapeError};
use crate::domain::model::WeeklyScore;
use serde_json::Value;

#[derive(Default)]
struct ScoreBuilder {
    team_name: Slot<String>,
    points: Slot<f64>,
}

impl ScoreBuilder {
    fn absorb(&mut self, key: &str, value: &Node) {
        match key {
            "name" => {
                self.team_name.offer_text(value.as_text());
            }
            "team_points" => {
                let points = match value {
                    Node::Object(_) => value.get("total").map(Node::to_float_or_zero),
                    scalar => Some(scalar.to_float_or_zero()),
                };
                self.points.offer_opt(points);
            }
            _ => {}
        }
    }

    fn build(self, week: u32) -> Option<WeeklyScore> {
        if !self.team_name.is_set() {
            return None;
        }
        Some(WeeklyScore {
            team_name: self.team_name.into_string(),
            week,
            points: self.points.into_value(),
        })
    }
}

fn decode_into(root: &Node, week: u32, out: &mut Vec<WeeklyScore>) -> Result<(), ShapeError> {
    for block in root_blocks(root, "league")? {
        let Some(scoreboard) = block.get("scoreboard") else {
            continue;
        };
        let matchups = collection_at(
            scoreboard.path(&["0", "matchups"]),
            "league.scoreboard.0.matchups",
        );

        for entry in matchups {
            let Some(matchup) = entry.get("matchup") else {
                continue;
            };
            let teams = collection_at(matchup.path(&["0", "teams"]), "matchup.0.teams");
            for team_entry in teams {
                let Some(team) = team_entry.get("team") else {
                    continue;
                };
                let mut builder = ScoreBuilder::default();
                for (key, value) in entity_fields(team) {
                    builder.absorb(key, value);
                }
                if let Some(score) = builder.build(week) {
                    out.push(score);
                }
            }
        }
    }
    Ok(())
}

/// `week` 當週每場對戰中每支隊伍各一筆分數
pub fn decode_weekly_scores(envelope: Option<&Value>, week: u32) -> Vec<WeeklyScore> {
    run_decoder("scoreboard", envelope, |root, out| decode_into(root, week, out))
}
