use super::{collection_at, manager_nickname, root_blocks, run_decoder};
use crate::core::builder::Slot;
use crate::core::node::{entity_fields, Node, ShapeError};
use crate::domain::model::Team;
use serde_json::Value;

#[derive(Default)]
struct TeamBuilder {
    name: Slot<String>,
    team_key: Slot<String>,
    team_id: Slot<String>,
    manager: Slot<String>,
    logo_url: Slot<String>,
    waiver_priority: Slot<i64>,
    moves: Slot<i64>,
    trades: Slot<i64>,
}

fn first_logo_url(logos: &Node) -> Option<String> {
    logos
        .items()
        .first()?
        .path(&["team_logo", "url"])?
        .as_text()
}

impl TeamBuilder {
    fn absorb(&mut self, key: &str, value: &Node) {
        match key {
            "name" => {
                self.name.offer_text(value.as_text());
            }
            "team_key" => {
                self.team_key.offer_text(value.as_text());
            }
            "team_id" => {
                self.team_id.offer_text(value.as_text());
            }
            "team_logos" => {
                self.logo_url.offer_text(first_logo_url(value));
            }
            "managers" => {
                self.manager.offer_text(manager_nickname(value));
            }
            "waiver_priority" => {
                self.waiver_priority.offer(value.to_int_or_zero());
            }
            "number_of_moves" => {
                self.moves.offer(value.to_int_or_zero());
            }
            "number_of_trades" => {
                self.trades.offer(value.to_int_or_zero());
            }
            _ => {}
        }
    }

    fn build(self) -> Option<Team> {
        if !self.name.is_set() {
            return None;
        }
        Some(Team {
            name: self.name.into_string(),
            team_key: self.team_key.into_string(),
            team_id: self.team_id.into_string(),
            manager: self.manager.into_string(),
            logo_url: self.logo_url.into_string(),
            waiver_priority: self.waiver_priority.into_value(),
            moves: self.moves.into_value(),
            trades: self.trades.into_value(),
        })
    }
}

fn decode_into(root: &Node, out: &mut Vec<Team>) -> Result<(), ShapeError> {
    for block in root_blocks(root, "league")? {
        for entry in collection_at(block.get("teams"), "league.teams") {
            let Some(team) = entry.get("team") else {
                continue;
            };
            let mut builder = TeamBuilder::default();
            for (key, value) in entity_fields(team) {
                builder.absorb(key, value);
            }
            if let Some(team) = builder.build() {
                out.push(team);
            }
        }
    }
    Ok(())
}

/// 聯盟所有隊伍，保留回應中的順序
pub fn decode_teams(envelope: Option<&Value>) -> Vec<Team> {
    run_decoder("teams", envelope, decode_into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_detail_list_and_attribute_dict() {
        let envelope = json!({
            "fantasy_content": {"league": [
                {"league_key": "449.l.1", "name": "x-lte"},
                {"teams": {
                    "0": {"team": [
                        [
                            {"team_key": "449.l.1.t.1"},
                            {"team_id": "1"},
                            {"name": "Gridiron Gurus"},
                            [],
                            {"team_logos": [{"team_logo": {"size": "large", "url": "https://img/1.png"}}]},
                            {"waiver_priority": 3},
                            {"number_of_moves": "12"},
                            {"number_of_trades": "bad"},
                            {"managers": {"0": {"manager": {"nickname": "Alice"}}, "count": 1}}
                        ]
                    ]},
                    "count": 1
                }}
            ]}
        });

        let teams = decode_teams(Some(&envelope));
        assert_eq!(teams.len(), 1);
        let team = &teams[0];
        assert_eq!(team.name, "Gridiron Gurus");
        assert_eq!(team.team_key, "449.l.1.t.1");
        assert_eq!(team.team_id, "1");
        assert_eq!(team.logo_url, "https://img/1.png");
        assert_eq!(team.manager, "Alice");
        assert_eq!(team.waiver_priority, 3);
        assert_eq!(team.moves, 12);
        assert_eq!(team.trades, 0);
    }

    #[test]
    fn test_repeated_fields_keep_first_value() {
        let envelope = json!({
            "fantasy_content": {"league": [{"teams": [
                {"team": [
                    [{"name": "Original"}, {"number_of_moves": "4"}],
                    {"name": "Stray Copy", "number_of_moves": "40"}
                ]}
            ]}]}
        });
        let teams = decode_teams(Some(&envelope));
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Original");
        assert_eq!(teams[0].moves, 4);
    }

    #[test]
    fn test_single_team_object_is_wrapped() {
        let envelope = json!({
            "fantasy_content": {"league": [{"teams": {
                "0": {"team": {"name": "Lonely", "team_key": "t.9"}},
                "count": 1
            }}]}
        });
        let teams = decode_teams(Some(&envelope));
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Lonely");
        assert_eq!(teams[0].manager, "");
    }
}
