use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Report-level metadata. A report holds at most one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Where the client posts editable-field values (`<base url><cache key>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_post_url: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) {
        self.attributes.insert(key.into(), value.to_string());
    }
}
