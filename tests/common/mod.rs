#![allow(dead_code)]

use async_trait::async_trait;
use report_engine::component::{Dataset, Table, TextLevel};
use report_engine::render::{PdfOptions, PdfRenderer, ReportDocument};
use report_engine::report::{ComponentBuilder, ReportDefinition};
use report_engine::{Error, ReportOptions, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Run summary used across the integration tests.
///
/// Layout: h1, editable text, `tables` tables, results bar chart, line chart, parameters.
pub struct RunSummary {
    pub project_id: u64,
    pub tables: usize,
    pub ttl: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
}

impl RunSummary {
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            tables: 1,
            ttl: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_tables(mut self, tables: usize) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn sharing_calls(mut self, calls: &Arc<AtomicUsize>) -> Self {
        self.calls = calls.clone();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportDefinition for RunSummary {
    fn class_name(&self) -> &str {
        "Report::RunSummary"
    }

    fn name(&self) -> &str {
        "Run summary"
    }

    fn options(&self) -> ReportOptions {
        ReportOptions::new().with("project_id", self.project_id)
    }

    fn expires_in(&self, default: Duration) -> Duration {
        self.ttl.unwrap_or(default)
    }

    async fn do_query(&self, b: &mut ComponentBuilder) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        b.h1("Run summary")?;
        b.editable_text(TextLevel::P, "No comments")?;
        for i in 0..self.tables {
            b.t(Table::new(["Case", "Result"])
                .with_title(format!("Suite {}", i))
                .with_row([format!("case-{}", i), "passed".to_string()]))?;
        }
        b.bar_chart_results(
            "Results",
            ["passed", "failed"],
            vec![Dataset::new("run", vec![4.0, 1.0])],
        )?;
        b.line_chart(
            "Trend",
            ["mon", "tue"],
            vec![Dataset::new("passed", vec![3.0, 4.0])],
        )?;
        b.show_params([("Project", self.project_id)])?;
        Ok(())
    }
}

/// Report whose query always fails.
pub struct Failing;

#[async_trait]
impl ReportDefinition for Failing {
    fn class_name(&self) -> &str {
        "Report::Failing"
    }

    async fn do_query(&self, _: &mut ComponentBuilder) -> Result<()> {
        Err(Error::cache("database unavailable"))
    }
}

/// PDF renderer that records the options it was called with.
#[derive(Default)]
pub struct RecordingPdf {
    pub calls: Mutex<Vec<(usize, PdfOptions)>>,
}

impl PdfRenderer for RecordingPdf {
    fn render(&self, document: &ReportDocument<'_>, options: &PdfOptions) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((document.components.len(), options.clone()));
        Ok(format!("%PDF {}", document.name).into_bytes())
    }
}
