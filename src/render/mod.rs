//! Export collaborators.
//!
//! PDF and spreadsheet generation live outside this crate; reports hand a
//! [`ReportDocument`] to whatever [`PdfRenderer`] / [`SpreadsheetRenderer`] the
//! engine was built with. JSON output is produced here.

use crate::cache::CacheKey;
use crate::component::{Chart, Component, Table};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only view of a loaded report passed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct ReportDocument<'a> {
    pub name: &'a str,
    pub class_key: &'a str,
    pub cache_key: &'a CacheKey,
    pub components: &'a [Component],
}

impl<'a> ReportDocument<'a> {
    pub fn tables(&self) -> impl Iterator<Item = &'a Table> + 'a {
        let components = self.components;
        components.iter().filter_map(Component::as_table)
    }

    pub fn charts(&self) -> impl Iterator<Item = &'a Chart> + 'a {
        let components = self.components;
        components.iter().filter_map(Component::as_chart)
    }

    /// `{"type": "report", "components": [...]}`
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "type": "report",
            "components": serde_json::to_value(self.components)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    Portrait,
    Landscape,
}

/// Page setup handed to the PDF renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub page_layout: PageLayout,
    pub page_size: String,
    /// Renderer specific options passed through untouched.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_layout: PageLayout::Landscape,
            page_size: "A4".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl PdfOptions {
    pub fn with_page_layout(mut self, layout: PageLayout) -> Self {
        self.page_layout = layout;
        self
    }

    pub fn with_page_size(mut self, size: impl Into<String>) -> Self {
        self.page_size = size.into();
        self
    }
}

pub trait PdfRenderer: Send + Sync {
    fn render(&self, document: &ReportDocument<'_>, options: &PdfOptions) -> Result<Vec<u8>>;
}

pub trait SpreadsheetRenderer: Send + Sync {
    fn render(&self, document: &ReportDocument<'_>) -> Result<Vec<u8>>;
}

/// Placeholder used until a real renderer is wired in; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRenderer;

impl UnconfiguredRenderer {
    fn error(what: &str, document: &ReportDocument<'_>) -> Error {
        Error::render_with_context(
            format!("no {} renderer configured", what),
            ErrorContext::new()
                .with_field_path(document.class_key)
                .with_source("report_engine"),
        )
    }
}

impl PdfRenderer for UnconfiguredRenderer {
    fn render(&self, document: &ReportDocument<'_>, _options: &PdfOptions) -> Result<Vec<u8>> {
        Err(Self::error("pdf", document))
    }
}

impl SpreadsheetRenderer for UnconfiguredRenderer {
    fn render(&self, document: &ReportDocument<'_>) -> Result<Vec<u8>> {
        Err(Self::error("spreadsheet", document))
    }
}
