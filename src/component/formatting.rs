use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingDirective {
    PageBreak,
    /// Vertical padding in points.
    Pad(f32),
    /// Text style options applied to the components that follow.
    TextOptions(BTreeMap<String, serde_json::Value>),
}

/// Layout directive for renderers; carries no content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formatting {
    pub directive: FormattingDirective,
}

impl Formatting {
    pub fn page_break() -> Self {
        Self {
            directive: FormattingDirective::PageBreak,
        }
    }

    pub fn pad(amount: f32) -> Self {
        Self {
            directive: FormattingDirective::Pad(amount),
        }
    }

    pub fn text_options(options: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            directive: FormattingDirective::TextOptions(options),
        }
    }
}
