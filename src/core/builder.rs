//! 從重複的細節區塊組裝紀錄時使用的欄位槽
//!
//! 每個欄位只接受第一次有意義的寫入，文件後段重複出現的結構不會覆蓋已讀到的值。
//! 空字串不算寫入。

#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Slot<T> {
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// 寫入成功時回傳 `true`
    pub fn offer(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn offer_opt(&mut self, value: Option<T>) -> bool {
        match value {
            Some(v) => self.offer(v),
            None => false,
        }
    }
}

impl Slot<String> {
    pub fn offer_text(&mut self, value: Option<String>) -> bool {
        match value {
            Some(v) if !v.is_empty() => self.offer(v),
            _ => false,
        }
    }

    pub fn into_string(self) -> String {
        self.value.unwrap_or_default()
    }
}

impl<T: Default> Slot<T> {
    pub fn into_value(self) -> T {
        self.value.unwrap_or_default()
    }
}
