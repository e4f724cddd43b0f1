//! Envelope 解碼器
//!
//! 每個解碼器接收整個 envelope (或沒有資料)，不會失敗，回傳能組出的所有紀錄。
//! 巢狀集合格式錯誤時略過該筆並繼續處理同層其他資料；只有根節點型別錯誤才會
//! 結束該 envelope 的解析。

pub mod leagues;
pub mod roster;
pub mod scoreboard;
pub mod standings;
pub mod teams;

pub use leagues::{decode_current_week, decode_leagues};
pub use roster::decode_roster;
pub use scoreboard::decode_weekly_scores;
pub use standings::decode_standings;
pub use teams::decode_teams;

use crate::core::node::{Node, ShapeError};
use serde_json::Value;

pub(crate) const ROOT_KEY: &str = "fantasy_content";

pub(crate) fn run_decoder<T>(
    resource: &str,
    envelope: Option<&Value>,
    decode: impl FnOnce(&Node, &mut Vec<T>) -> Result<(), ShapeError>,
) -> Vec<T> {
    let mut records = Vec::new();
    let Some(envelope) = envelope else {
        tracing::debug!("No {} envelope to decode", resource);
        return records;
    };

    let root = Node::from(envelope);
    if let Err(e) = decode(&root, &mut records) {
        tracing::warn!(
            "Failed to decode {} envelope: {} (kept {} record(s))",
            resource,
            e,
            records.len()
        );
    }
    records
}

/// `fantasy_content.<key>` 底下的區塊，可能是清單或單一物件
pub(crate) fn root_blocks<'a>(root: &'a Node, key: &str) -> Result<Vec<&'a Node>, ShapeError> {
    match root.path(&[ROOT_KEY, key]) {
        None | Some(Node::Null) => Ok(Vec::new()),
        Some(node @ (Node::Object(_) | Node::Array(_))) => Ok(node.one_or_many()),
        Some(other) => Err(ShapeError::UnexpectedType {
            path: format!("{}.{}", ROOT_KEY, key),
            expected: "object or array",
            found: other.kind(),
        }),
    }
}

/// 取得巢狀集合；不存在或是純量時視為空集合，呼叫端繼續處理下一筆
pub(crate) fn collection_at<'a>(node: Option<&'a Node>, path: &str) -> Vec<&'a Node> {
    match node {
        Some(node @ (Node::Object(_) | Node::Array(_))) => node.items(),
        None | Some(Node::Null) => Vec::new(),
        Some(other) => {
            tracing::debug!("Skipping {}: expected a collection, found {}", path, other.kind());
            Vec::new()
        }
    }
}

/// `managers` (清單或索引鍵物件) 中第一位 manager 的暱稱
pub(crate) fn manager_nickname(managers: &Node) -> Option<String> {
    managers
        .items()
        .first()?
        .path(&["manager", "nickname"])?
        .as_text()
}

/// 連勝紀錄格式為類型首字母大寫加上數值，例如 win/3 → `W3`
pub(crate) fn format_streak(streak: &Node) -> String {
    let kind = streak.get("type").and_then(Node::as_text).unwrap_or_default();
    let value = streak.get("value").and_then(Node::as_text).unwrap_or_default();
    let initial: String = kind.chars().take(1).flat_map(char::to_uppercase).collect();
    format!("{}{}", initial, value)
}
