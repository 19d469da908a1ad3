//! # report-engine
//!
//! 报表运行时：将类型化组件组装为报表，缓存组装结果并交给导出器渲染。
//!
//! Report assembly runtime: typed components are assembled into a report body,
//! the assembled body is cached, and exports (CSV, JSON, PDF, spreadsheet) work on
//! the cached component sequence.
//!
//! ## Overview
//!
//! A report type implements [`ReportDefinition`]. Its `do_query` fills a
//! [`ComponentBuilder`](report::ComponentBuilder) with headings, tables, charts,
//! parameters and formatting directives. [`Report`] runs that query through the
//! [`CacheManager`](cache::CacheManager): fresh cached copies are served as-is,
//! stale or missing ones are rebuilt and written back.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`component`] | The closed set of report components and the registry |
//! | [`report`] | Report definitions, component builder, report state machine |
//! | [`cache`] | Cache key derivation, backends, fetch-or-compute strategies |
//! | [`render`] | PDF / spreadsheet renderer seams and JSON output |
//! | [`fields`] | Persisted editable-field submissions |
//! | [`config`] | Reporting settings from YAML and environment |
//! | [`engine`] | Engine handle wiring the collaborators together |
//! | [`logging`] | Tracing subscriber setup |

pub mod cache;
pub mod component;
pub mod config;
pub mod engine;
pub mod fields;
pub mod logging;
pub mod render;
pub mod report;
pub mod utils;

// Re-export main types for convenience
pub use cache::{CacheKey, CacheOutcome, ReportOptions};
pub use component::{Component, ComponentKind, ComponentRegistry};
pub use config::ReportSettings;
pub use engine::{ReportEngine, ReportEngineBuilder};
pub use report::{Report, ReportDefinition};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
