use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLevel {
    H1,
    H2,
    H3,
    P,
}

/// Heading or paragraph.
///
/// Editable texts get a `key` when added to a report; persisted user submissions
/// are matched back to the text through that key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub level: TextLevel,
    pub value: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Text {
    pub fn new(level: TextLevel, value: impl Into<String>) -> Self {
        Self {
            level,
            value: value.into(),
            editable: false,
            key: None,
        }
    }

    pub fn editable(level: TextLevel, value: impl Into<String>) -> Self {
        Self {
            editable: true,
            ..Self::new(level, value)
        }
    }
}
