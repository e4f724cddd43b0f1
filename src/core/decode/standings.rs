use super::{collection_at, format_streak, manager_nickname, root_blocks, run_decoder};
use crate::core::builder::Slot;
use crate::core::node::{entity_fields, Node, ShapeError};
use crate::domain::model::Standing;
use serde_json::Value;

#[derive(Default)]
struct StandingBuilder {
    name: Slot<String>,
    team_key: Slot<String>,
    manager: Slot<String>,
    rank: Slot<i64>,
    wins: Slot<i64>,
    losses: Slot<i64>,
    ties: Slot<i64>,
    points_for: Slot<f64>,
    points_against: Slot<f64>,
    streak: Slot<String>,
}

impl StandingBuilder {
    fn absorb(&mut self, key: &str, value: &Node) {
        match key {
            "name" => {
                self.name.offer_text(value.as_text());
            }
            "team_key" => {
                self.team_key.offer_text(value.as_text());
            }
            "managers" => {
                self.manager.offer_text(manager_nickname(value));
            }
            "team_standings" => self.absorb_team_standings(value),
            _ => {}
        }
    }

    fn absorb_team_standings(&mut self, ts: &Node) {
        self.rank.offer_opt(ts.get("rank").map(Node::to_int_or_zero));
        self.points_for
            .offer_opt(ts.get("points_for").map(Node::to_float_or_zero));
        self.points_against
            .offer_opt(ts.get("points_against").map(Node::to_float_or_zero));
        if let Some(streak) = ts.get("streak") {
            self.streak.offer_text(Some(format_streak(streak)));
        }
        if let Some(outcome) = ts.get("outcome_totals") {
            self.wins.offer_opt(outcome.get("wins").map(Node::to_int_or_zero));
            self.losses
                .offer_opt(outcome.get("losses").map(Node::to_int_or_zero));
            self.ties.offer_opt(outcome.get("ties").map(Node::to_int_or_zero));
        }
    }

    fn build(self) -> Option<Standing> {
        if !self.name.is_set() {
            return None;
        }
        Some(Standing {
            name: self.name.into_string(),
            team_key: self.team_key.into_string(),
            rank: self.rank.into_value(),
            wins: self.wins.into_value(),
            losses: self.losses.into_value(),
            ties: self.ties.into_value(),
            points_for: self.points_for.into_value(),
            points_against: self.points_against.into_value(),
            streak: self.streak.into_string(),
            manager: self.manager.into_string(),
        })
    }
}

fn decode_into(root: &Node, out: &mut Vec<Standing>) -> Result<(), ShapeError> {
    for block in root_blocks(root, "league")? {
        let Some(standings) = block.get("standings") else {
            continue;
        };
        let teams = collection_at(
            standings.path(&["0", "teams"]),
            "league.standings.0.teams",
        );

        for entry in teams {
            let Some(team) = entry.get("team") else {
                continue;
            };
            let mut builder = StandingBuilder::default();
            for (key, value) in entity_fields(team) {
                builder.absorb(key, value);
            }
            if let Some(standing) = builder.build() {
                out.push(standing);
            }
        }
    }
    Ok(())
}

/// 聯盟戰績，依回應中的名次穩定排序
pub fn decode_standings(envelope: Option<&Value>) -> Vec<Standing> {
    let mut standings = run_decoder("standings", envelope, decode_into);
    standings.sort_by_key(|s| s.rank);
    standings
}
