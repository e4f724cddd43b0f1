use super::{collection_at, root_blocks, run_decoder};
use crate::core::builder::Slot;
use crate::core::node::{entity_fields, Node, ShapeError};
use crate::domain::model::RosterEntry;
use serde_json::Value;

#[derive(Default)]
struct RosterEntryBuilder {
    name: Slot<String>,
    player_key: Slot<String>,
    position: Slot<String>,
    team: Slot<String>,
    status: Slot<String>,
    selected_position: Slot<String>,
}

fn full_name(name: &Node) -> Option<String> {
    match name {
        Node::Object(_) => name.get("full").and_then(Node::as_text),
        other => other.as_text(),
    }
}

/// `selected_position` 可能直接帶 `position`，或是區塊清單；
/// 清單時取第一個有 `position` 的區塊 (coverage 區塊排在前面)
fn selected_position(value: &Node) -> Option<String> {
    if let Some(position) = value.get("position") {
        return position.as_text();
    }
    value
        .items()
        .into_iter()
        .find_map(|block| block.get("position").and_then(Node::as_text))
}

impl RosterEntryBuilder {
    fn absorb(&mut self, key: &str, value: &Node) {
        match key {
            "name" => {
                self.name.offer_text(full_name(value));
            }
            "player_key" => {
                self.player_key.offer_text(value.as_text());
            }
            "editorial_team_abbr" => {
                self.team
                    .offer_text(value.as_text().map(|abbr| abbr.to_uppercase()));
            }
            "display_position" => {
                self.position.offer_text(value.as_text());
            }
            "status" => {
                self.status.offer_text(value.as_text());
            }
            "selected_position" => {
                self.selected_position.offer_text(selected_position(value));
            }
            _ => {}
        }
    }

    fn build(self) -> Option<RosterEntry> {
        if !self.name.is_set() {
            return None;
        }
        Some(RosterEntry {
            name: self.name.into_string(),
            player_key: self.player_key.into_string(),
            position: self.position.into_string(),
            team: self.team.into_string(),
            status: self.status.into_string(),
            selected_position: self.selected_position.into_string(),
        })
    }
}

fn decode_into(root: &Node, out: &mut Vec<RosterEntry>) -> Result<(), ShapeError> {
    for block in root_blocks(root, "team")? {
        let Some(roster) = block.get("roster") else {
            continue;
        };
        let players = collection_at(roster.path(&["0", "players"]), "team.roster.0.players");

        for entry in players {
            let Some(player) = entry.get("player") else {
                continue;
            };
            let mut builder = RosterEntryBuilder::default();
            for (key, value) in entity_fields(player) {
                builder.absorb(key, value);
            }
            if let Some(player) = builder.build() {
                out.push(player);
            }
        }
    }
    Ok(())
}

/// 單一隊伍的球員名單，保留回應中的順序
pub fn decode_roster(envelope: Option<&Value>) -> Vec<RosterEntry> {
    run_decoder("roster", envelope, decode_into)
}
