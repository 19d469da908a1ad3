//! 报表组件模块：定义报表可包含的封闭组件集合。
//!
//! # Components Module
//!
//! A report body is an ordered sequence of [`Component`]s. The set of variants is
//! closed: everything that goes into a report must be one of them, since the
//! sequence is cached as JSON and rendered by external collaborators.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Text`] | Heading or paragraph, optionally editable |
//! | [`Table`] | Tabular data with CSV export |
//! | [`Formatting`] | Page break, padding, text style directives |
//! | [`Parameters`] | Parameters the report was run with |
//! | [`Meta`] | Report-level metadata (at most one per report) |
//! | [`Chart`] | Bar, results bar, stacked bar, line and multi-line charts |
//! | [`ComponentRegistry`] | Kinds a report accepts |

mod chart;
mod formatting;
mod meta;
mod parameters;
mod registry;
mod table;
mod text;

pub use chart::{chart_image_key, Chart, ChartKind, Dataset};
pub use formatting::{Formatting, FormattingDirective};
pub use meta::Meta;
pub use parameters::Parameters;
pub use registry::ComponentRegistry;
pub use table::{CsvOptions, LineFeed, Table};
pub use text::{Text, TextLevel};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const TAGS: [&str; 6] = ["text", "table", "formatting", "parameters", "meta", "chart"];

/// One renderable unit of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Text(Text),
    Table(Table),
    Formatting(Formatting),
    Parameters(Parameters),
    Meta(Meta),
    Chart(Chart),
}

/// Registry-level kind of a component; charts are split by chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Text,
    Table,
    Formatting,
    Parameters,
    Meta,
    BarChart,
    BarResultsChart,
    BarStackChart,
    LineChart,
    MultiLineChart,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Text,
        ComponentKind::Table,
        ComponentKind::Formatting,
        ComponentKind::Parameters,
        ComponentKind::Meta,
        ComponentKind::BarChart,
        ComponentKind::BarResultsChart,
        ComponentKind::BarStackChart,
        ComponentKind::LineChart,
        ComponentKind::MultiLineChart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Table => "table",
            ComponentKind::Formatting => "formatting",
            ComponentKind::Parameters => "parameters",
            ComponentKind::Meta => "meta",
            ComponentKind::BarChart => "bar_chart",
            ComponentKind::BarResultsChart => "bar_results_chart",
            ComponentKind::BarStackChart => "bar_stack_chart",
            ComponentKind::LineChart => "line_chart",
            ComponentKind::MultiLineChart => "multi_line_chart",
        }
    }

    pub fn is_chart(&self) -> bool {
        matches!(
            self,
            ComponentKind::BarChart
                | ComponentKind::BarResultsChart
                | ComponentKind::BarStackChart
                | ComponentKind::LineChart
                | ComponentKind::MultiLineChart
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ChartKind> for ComponentKind {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar => ComponentKind::BarChart,
            ChartKind::BarResults => ComponentKind::BarResultsChart,
            ChartKind::BarStack => ComponentKind::BarStackChart,
            ChartKind::Line => ComponentKind::LineChart,
            ChartKind::LineMulti => ComponentKind::MultiLineChart,
        }
    }
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Text(_) => ComponentKind::Text,
            Component::Table(_) => ComponentKind::Table,
            Component::Formatting(_) => ComponentKind::Formatting,
            Component::Parameters(_) => ComponentKind::Parameters,
            Component::Meta(_) => ComponentKind::Meta,
            Component::Chart(c) => c.kind.into(),
        }
    }

    /// Decode a component from its JSON form.
    ///
    /// Values whose `type` (or chart `kind`) is not a known variant fail with
    /// [`Error::InvalidComponent`]; known variants with bad fields fail with
    /// [`Error::Serialization`].
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let tag = match value.get("type").and_then(|t| t.as_str()) {
            Some(tag) => tag.to_string(),
            None => {
                return Err(Error::InvalidComponent {
                    kind: "untyped value".to_string(),
                })
            }
        };
        if !TAGS.contains(&tag.as_str()) {
            return Err(Error::InvalidComponent { kind: tag });
        }
        if tag == "chart" {
            let kind = value.get("kind").cloned().unwrap_or(serde_json::Value::Null);
            if serde_json::from_value::<ChartKind>(kind.clone()).is_err() {
                return Err(Error::InvalidComponent {
                    kind: format!("chart/{}", kind.as_str().unwrap_or("?")),
                });
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Component::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Component::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&Chart> {
        match self {
            Component::Chart(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_meta(&self) -> Option<&Meta> {
        match self {
            Component::Meta(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Component::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Component::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_chart_mut(&mut self) -> Option<&mut Chart> {
        match self {
            Component::Chart(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_meta_mut(&mut self) -> Option<&mut Meta> {
        match self {
            Component::Meta(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_parameters(&self) -> Option<&Parameters> {
        match self {
            Component::Parameters(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Text> for Component {
    fn from(c: Text) -> Self {
        Component::Text(c)
    }
}
impl From<Table> for Component {
    fn from(c: Table) -> Self {
        Component::Table(c)
    }
}
impl From<Formatting> for Component {
    fn from(c: Formatting) -> Self {
        Component::Formatting(c)
    }
}
impl From<Parameters> for Component {
    fn from(c: Parameters) -> Self {
        Component::Parameters(c)
    }
}
impl From<Meta> for Component {
    fn from(c: Meta) -> Self {
        Component::Meta(c)
    }
}
impl From<Chart> for Component {
    fn from(c: Chart) -> Self {
        Component::Chart(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_shape_is_tagged() {
        let c: Component = Text::editable(TextLevel::H2, "Summary").into();
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"type": "text", "level": "h2", "value": "Summary", "editable": true})
        );
    }

    #[test]
    fn test_from_json_known_variants() {
        let table = Component::from_json(json!({
            "type": "table", "headers": ["a"], "rows": [["1"]]
        }))
        .unwrap();
        assert_eq!(table.kind(), ComponentKind::Table);
        assert_eq!(table.as_table().unwrap().row(0), Some(&["1".to_string()][..]));

        let chart = Component::from_json(json!({
            "type": "chart", "kind": "line_multi", "title": "Trend"
        }))
        .unwrap();
        assert_eq!(chart.kind(), ComponentKind::MultiLineChart);
        assert!(chart.kind().is_chart());
    }

    #[test]
    fn test_from_json_rejects_unknown_variants() {
        let err = Component::from_json(json!({"type": "video", "src": "x"})).unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { ref kind } if kind == "video"));

        let err = Component::from_json(json!({"type": "chart", "kind": "pie", "title": "x"}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { .. }));

        assert!(matches!(
            Component::from_json(json!(["text"])),
            Err(Error::InvalidComponent { .. })
        ));
        assert!(matches!(
            Component::from_json(json!({"type": "text", "level": 3})),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_formatting_round_trips_through_json() {
        let components: Vec<Component> = vec![
            Formatting::page_break().into(),
            Formatting::pad(12.0).into(),
            Parameters::new("Run summary", [("Project", 4)]).into(),
        ];
        let encoded = serde_json::to_vec(&components).unwrap();
        let decoded: Vec<Component> = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, components);
    }
}
