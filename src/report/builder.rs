//! Component builder used inside `do_query`.

use super::{Report, ReportDefinition};
use crate::cache::CacheKey;
use crate::component::{
    chart_image_key, Chart, ChartKind, Component, ComponentKind, ComponentRegistry, Dataset,
    Formatting, Meta, Parameters, Table, Text, TextLevel,
};
use crate::engine::ReportEngine;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Accumulates the ordered component sequence of one report.
///
/// Positions matter: a chart or editable text added at index `i` is keyed
/// `<report_class>/<i>`, and charts get an image key derived from the report cache
/// key and `i`. Identical `do_query` runs therefore produce identical keys.
pub struct ComponentBuilder {
    class_key: String,
    report_name: String,
    cache_key: CacheKey,
    registry: ComponentRegistry,
    components: Vec<Component>,
    engine: ReportEngine,
}

impl ComponentBuilder {
    pub(crate) fn new(
        class_key: impl Into<String>,
        report_name: impl Into<String>,
        cache_key: CacheKey,
        registry: ComponentRegistry,
        engine: ReportEngine,
    ) -> Self {
        Self {
            class_key: class_key.into(),
            report_name: report_name.into(),
            cache_key,
            registry,
            components: Vec::new(),
            engine,
        }
    }

    /// Engine the report runs in, for constructing subreports.
    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub(crate) fn into_components(self) -> Vec<Component> {
        self.components
    }

    /// Append a component, assigning its derived keys.
    ///
    /// Fails with [`Error::InvalidComponent`](crate::Error::InvalidComponent) when the
    /// kind is not in the report's registry; the sequence is left untouched then.
    pub fn add_component(&mut self, component: impl Into<Component>) -> Result<&mut Component> {
        let mut component = component.into();
        self.registry.check(&component)?;
        let index = self.components.len();
        match &mut component {
            Component::Chart(chart) => {
                chart.chart_image_key = Some(chart_image_key(&self.cache_key, index));
                chart.key = Some(self.component_key(index));
            }
            Component::Text(text) if text.editable => {
                text.key = Some(self.component_key(index));
            }
            Component::Parameters(params) if params.name != self.report_name => {
                params.parent_name = Some(self.report_name.clone());
            }
            _ => {}
        }
        self.components.push(component);
        Ok(&mut self.components[index])
    }

    /// Decode a component from JSON and add it.
    pub fn add_json_component(&mut self, value: serde_json::Value) -> Result<&mut Component> {
        let component = Component::from_json(value)?;
        self.add_component(component)
    }

    /// Append every component of `report`, loading it first if needed.
    ///
    /// Keys are reassigned for the positions the components take in this report.
    /// Nothing is appended if any of them is rejected by the registry.
    pub async fn add_subreport<S: ReportDefinition>(
        &mut self,
        report: &mut Report<S>,
    ) -> Result<usize> {
        let components = report.components().await?.to_vec();
        for component in &components {
            self.registry.check(component)?;
        }
        let count = components.len();
        for component in components {
            self.add_component(component)?;
        }
        Ok(count)
    }

    /// The report's single [`Meta`] component, created on first use.
    pub fn meta(&mut self) -> Result<&mut Meta> {
        find_or_insert_meta(&mut self.components, &self.registry)
    }

    pub fn h1(&mut self, value: impl Into<String>) -> Result<&mut Component> {
        self.add_component(Text::new(TextLevel::H1, value))
    }

    pub fn h2(&mut self, value: impl Into<String>) -> Result<&mut Component> {
        self.add_component(Text::new(TextLevel::H2, value))
    }

    pub fn h3(&mut self, value: impl Into<String>) -> Result<&mut Component> {
        self.add_component(Text::new(TextLevel::H3, value))
    }

    pub fn text(&mut self, value: impl Into<String>) -> Result<&mut Component> {
        self.add_component(Text::new(TextLevel::P, value))
    }

    pub fn editable_text(
        &mut self,
        level: TextLevel,
        value: impl Into<String>,
    ) -> Result<&mut Component> {
        self.add_component(Text::editable(level, value))
    }

    pub fn show_params<I, K, V>(&mut self, params: I) -> Result<&mut Component>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let params = Parameters::new(self.report_name.clone(), params);
        self.add_component(params)
    }

    pub fn page_break(&mut self) -> Result<&mut Component> {
        self.add_component(Formatting::page_break())
    }

    pub fn pad(&mut self, amount: f32) -> Result<&mut Component> {
        self.add_component(Formatting::pad(amount))
    }

    pub fn text_options(
        &mut self,
        options: BTreeMap<String, serde_json::Value>,
    ) -> Result<&mut Component> {
        self.add_component(Formatting::text_options(options))
    }

    pub fn t(&mut self, table: Table) -> Result<&mut Component> {
        self.add_component(table)
    }

    pub fn bar_chart<L, S>(
        &mut self,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart(ChartKind::Bar, title, labels, datasets)
    }

    pub fn bar_chart_results<L, S>(
        &mut self,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart(ChartKind::BarResults, title, labels, datasets)
    }

    pub fn bar_stack_chart<L, S>(
        &mut self,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart(ChartKind::BarStack, title, labels, datasets)
    }

    pub fn line_chart<L, S>(
        &mut self,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart(ChartKind::Line, title, labels, datasets)
    }

    pub fn multi_line_chart<L, S>(
        &mut self,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart(ChartKind::LineMulti, title, labels, datasets)
    }

    fn chart<L, S>(
        &mut self,
        kind: ChartKind,
        title: impl Into<String>,
        labels: L,
        datasets: Vec<Dataset>,
    ) -> Result<&mut Component>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chart = Chart::new(kind, title).with_labels(labels);
        chart.datasets = datasets;
        self.add_component(chart)
    }

    fn component_key(&self, index: usize) -> String {
        format!("{}/{}", self.class_key, index)
    }
}

/// Meta carries no derived keys, so pushing it directly matches `add_component`.
pub(crate) fn find_or_insert_meta<'a>(
    components: &'a mut Vec<Component>,
    registry: &ComponentRegistry,
) -> Result<&'a mut Meta> {
    if !components.iter().any(|c| matches!(c, Component::Meta(_))) {
        let meta = Component::Meta(Meta::new());
        registry.check(&meta)?;
        components.push(meta);
    }
    components
        .iter_mut()
        .find_map(Component::as_meta_mut)
        .ok_or_else(|| Error::InvalidComponent {
            kind: ComponentKind::Meta.to_string(),
        })
}
