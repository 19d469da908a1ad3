//! Filtered views over a loaded report.

use crate::component::{Chart, Table};
use crate::{Error, Result};

/// The tables of a report in display order.
pub struct TableList<'a> {
    tables: Vec<&'a mut Table>,
}

impl<'a> TableList<'a> {
    pub(crate) fn new(tables: Vec<&'a mut Table>) -> Self {
        Self { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index).map(|t| &**t)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().map(|t| &**t)
    }

    /// Point each table at `<base_url><position among tables>`.
    pub fn set_csv_export_url(&mut self, base_url: &str) {
        for (index, table) in self.tables.iter_mut().enumerate() {
            table.csv_export_url = Some(format!("{}{}", base_url, index));
        }
    }

    /// Row `x` of the table at `table_index`, `None` past the last row.
    pub fn row(&self, x: usize, table_index: usize) -> Result<Option<&[String]>> {
        let table = self.get(table_index).ok_or(Error::TableIndexOutOfRange {
            index: table_index,
            available: self.len(),
        })?;
        Ok(table.row(x))
    }
}

/// The charts of a report in display order.
pub struct ChartList<'a> {
    charts: Vec<&'a mut Chart>,
}

impl<'a> ChartList<'a> {
    pub(crate) fn new(charts: Vec<&'a mut Chart>) -> Self {
        Self { charts }
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chart> {
        self.charts.get(index).map(|c| &**c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter().map(|c| &**c)
    }

    /// Point each chart at `<base_url><chart image key>`.
    pub fn set_image_post_url(&mut self, base_url: &str) {
        for chart in self.charts.iter_mut() {
            let image_key = chart.chart_image_key.as_deref().unwrap_or_default();
            chart.image_post_url = Some(format!("{}{}", base_url, image_key));
        }
    }
}
