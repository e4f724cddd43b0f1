//! API envelope 的可導覽表示
//!
//! 同一個集合在回應中可能是以 `"0"`、`"1"` ... 為鍵並附帶 `"count"` 的物件、
//! 一般陣列，或是單一物件。`Node` 保留收到時的鍵順序，每一步導覽都有明確的存取方法。

use serde_json::Value;
use thiserror::Error;

/// 索引鍵集合旁的計數欄位，不屬於集合元素
pub const COUNT_KEY: &str = "count";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

/// 走訪 envelope 時遇到的結構不符；只在解碼器內部使用
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("expected {expected} at '{path}', found {found}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => n.as_f64().map(Node::Number).unwrap_or(Node::Null),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(items) => Node::Array(items.iter().map(Node::from).collect()),
            // serde_json 開啟 preserve_order，這裡就是收到的順序
            Value::Object(map) => Node::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Node::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from(&value)
    }
}

impl Node {
    /// 沒有 envelope 時視同 JSON null
    pub fn from_envelope(envelope: Option<&Value>) -> Node {
        envelope.map(Node::from).unwrap_or(Node::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// 單一步導覽。數字鍵也能當陣列索引，所以 `"0"` 對兩種集合編碼都有效
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Node::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub fn path(&self, steps: &[&str]) -> Option<&Node> {
        steps.iter().try_fold(self, |node, step| node.get(step))
    }

    /// 集合展開
    ///
    /// 物件：依收到順序取值並排除 `"count"`；陣列：原樣回傳元素；其他：空集合
    pub fn items(&self) -> Vec<&Node> {
        match self {
            Node::Object(entries) => entries
                .iter()
                .filter(|(k, _)| k != COUNT_KEY)
                .map(|(_, v)| v)
                .collect(),
            Node::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// 單一物件代替只有一個元素的清單時使用 (`"team": {...}` 而非 `"team": [...]`)
    pub fn one_or_many(&self) -> Vec<&Node> {
        match self {
            Node::Object(_) => vec![self],
            Node::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn entries(&self) -> &[(String, Node)] {
        match self {
            Node::Object(entries) => entries,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// 純量轉成文字；識別碼可能是字串或數字
    pub fn as_text(&self) -> Option<String> {
        match self {
            Node::String(s) => Some(s.clone()),
            Node::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Node::Number(n) => Some(n.to_string()),
            Node::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// 轉成整數，不是整數時回傳 `None`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            Node::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// 轉成浮點數，NaN 與無限大視為格式錯誤
    pub fn as_float(&self) -> Option<f64> {
        let value = match self {
            Node::Number(n) => Some(*n),
            Node::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn to_int_or_zero(&self) -> i64 {
        self.as_int().unwrap_or(0)
    }

    pub fn to_float_or_zero(&self) -> f64 {
        self.as_float().unwrap_or(0.0)
    }
}

/// 走訪單一實體 (`team`、`player`、`league`)，依文件順序取出所有 `(key, value)`
///
/// 實體可能是單鍵物件組成的清單，也可能是具名屬性的物件，兩種編碼都支援
pub fn entity_fields(entity: &Node) -> Vec<(&str, &Node)> {
    let mut fields = Vec::new();
    for block in entity.one_or_many() {
        match block {
            Node::Array(details) => {
                for detail in details {
                    for (k, v) in detail.entries() {
                        fields.push((k.as_str(), v));
                    }
                }
            }
            Node::Object(entries) => {
                for (k, v) in entries {
                    fields.push((k.as_str(), v));
                }
            }
            _ => {}
        }
    }
    fields
}
