mod common;

use async_trait::async_trait;
use common::RunSummary;
use report_engine::component::TextLevel;
use report_engine::fields::{FieldSubmission, InMemoryFieldStore};
use report_engine::report::{ComponentBuilder, ReportDefinition};
use report_engine::{Error, ReportEngine, Result};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

struct Commented;

#[async_trait]
impl ReportDefinition for Commented {
    fn class_name(&self) -> &str {
        "ReportClass"
    }

    async fn do_query(&self, b: &mut ComponentBuilder) -> Result<()> {
        b.editable_text(TextLevel::P, "old value")?;
        b.text("static text")?;
        Ok(())
    }
}

fn engine_with(store: &Arc<InMemoryFieldStore>) -> ReportEngine {
    ReportEngine::builder().field_store(store.clone()).build()
}

#[tokio::test]
async fn test_update_applies_latest_submission() {
    let store = Arc::new(InMemoryFieldStore::new());
    let engine = engine_with(&store);
    let mut report = engine.report(Commented);
    let key = report.cache_key().clone();

    let draft = FieldSubmission::new(5, 10, key.clone()).with_value("report_class/0", "draft");
    let final_value = FieldSubmission::new(5, 10, key).with_value("report_class/0", "new value");
    assert_ok!(store.submit(draft));
    assert_ok!(store.submit(final_value));

    assert_eq!(assert_ok!(report.update(10, 5).await), 1);
    let components = assert_ok!(report.components().await);
    let text = components[0].as_text().unwrap();
    assert_eq!(text.key.as_deref(), Some("report_class/0"));
    assert_eq!(text.value, "new value");
    assert_eq!(components[1].as_text().unwrap().value, "static text");
}

#[tokio::test]
async fn test_update_without_submission_changes_nothing() {
    let store = Arc::new(InMemoryFieldStore::new());
    let engine = engine_with(&store);
    let mut report = engine.report(Commented);

    assert_eq!(assert_ok!(report.update(10, 5).await), 0);
    let components = assert_ok!(report.components().await);
    assert_eq!(components[0].as_text().unwrap().value, "old value");
}

#[tokio::test]
async fn test_update_rejects_unknown_key() {
    let store = Arc::new(InMemoryFieldStore::new());
    let engine = engine_with(&store);
    let mut report = engine.report(Commented);
    let submission = FieldSubmission::new(5, 10, report.cache_key().clone())
        .with_value("report_class/0", "new value")
        .with_value("report_class/1", "not editable");
    assert_ok!(store.submit(submission));

    let err = assert_err!(report.update(10, 5).await);
    assert!(matches!(err, Error::UnmatchedEditableField { ref key } if key == "report_class/1"));
    let components = assert_ok!(report.components().await);
    assert_eq!(components[0].as_text().unwrap().value, "old value");
}

#[tokio::test]
async fn test_update_is_scoped_to_user_and_report() {
    let store = Arc::new(InMemoryFieldStore::new());
    let engine = engine_with(&store);
    let mut summary = engine.report(RunSummary::new(1));
    let key = summary.cache_key().clone();
    assert_ok!(store.submit(
        FieldSubmission::new(5, 10, key).with_value("report/run_summary/1", "Looks good")
    ));

    assert_eq!(assert_ok!(summary.update(10, 6).await), 0);
    let mut other = engine.report(Commented);
    assert_eq!(assert_ok!(other.update(10, 5).await), 0);

    assert_eq!(assert_ok!(summary.update(10, 5).await), 1);
    let components = assert_ok!(summary.components().await);
    assert_eq!(components[1].as_text().unwrap().value, "Looks good");
}

#[tokio::test]
async fn test_updated_values_are_not_cached() {
    let store = Arc::new(InMemoryFieldStore::new());
    let engine = engine_with(&store);
    let mut report = engine.report(Commented);
    let submission = FieldSubmission::new(5, 10, report.cache_key().clone())
        .with_value("report_class/0", "new value");
    assert_ok!(store.submit(submission));
    assert_ok!(report.update(10, 5).await);

    let mut fresh = engine.report(Commented);
    let components = assert_ok!(fresh.components().await);
    assert_eq!(components[0].as_text().unwrap().value, "old value");
}
