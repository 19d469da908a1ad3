use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Row terminator used in CSV exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFeed {
    #[default]
    Crlf,
    Lf,
    Cr,
}

impl LineFeed {
    fn terminator(self) -> csv::Terminator {
        match self {
            LineFeed::Crlf => csv::Terminator::CRLF,
            LineFeed::Lf => csv::Terminator::Any(b'\n'),
            LineFeed::Cr => csv::Terminator::Any(b'\r'),
        }
    }
}

/// CSV export settings. Defaults to `;` separated fields and CRLF rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub line_feed: LineFeed,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            line_feed: LineFeed::Crlf,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_line_feed(mut self, line_feed: LineFeed) -> Self {
        self.line_feed = line_feed;
        self
    }
}

/// Table data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_export_url: Option<String>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            csv_export_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows.push(cells.into_iter().map(|c| c.to_string()).collect());
    }

    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.add_row(cells);
        self
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Header line (when present) followed by every row. Rows may differ in length.
    pub fn to_csv(&self, options: &CsvOptions) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .terminator(options.line_feed.terminator())
            .flexible(true)
            .from_writer(Vec::new());
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            Error::render_with_context(
                "csv output is not valid UTF-8",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("csv_export"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_defaults() {
        let table = Table::new(["Case", "Result"])
            .with_row(["login", "passed"])
            .with_row(["logout; forced", "failed"]);
        let csv = table.to_csv(&CsvOptions::default()).unwrap();
        assert_eq!(csv, "Case;Result\r\nlogin;passed\r\n\"logout; forced\";failed\r\n");
    }

    #[test]
    fn test_csv_custom_delimiter_and_ragged_rows() {
        let mut table = Table::new(Vec::<String>::new());
        table.add_row([1, 2, 3]);
        table.add_row([4]);
        let options = CsvOptions::default()
            .with_delimiter(b',')
            .with_line_feed(LineFeed::Lf);
        assert_eq!(table.to_csv(&options).unwrap(), "1,2,3\n4\n");
    }
}
