use crate::cache::CacheKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    /// Bar chart of pass/fail/not-run counts.
    BarResults,
    BarStack,
    Line,
    /// Line chart with several series sharing the x axis.
    LineMulti,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Chart data for visualizations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// `<report_class>/<index>`, used by the UI to persist chart scaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Correlates the chart with its rendered image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_image_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_post_url: Option<String>,
}

impl Chart {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            labels: Vec::new(),
            datasets: Vec::new(),
            key: None,
            chart_image_key: None,
            image_post_url: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }
}

/// Image key of the chart at `index` in the report identified by `cache_key`.
pub fn chart_image_key(cache_key: &CacheKey, index: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}/{}", cache_key.as_str(), index).as_bytes());
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_image_key_is_positional_and_stable() {
        let key = CacheKey::new("abc");
        let first = chart_image_key(&key, 0);
        assert_eq!(first, chart_image_key(&CacheKey::new("abc"), 0));
        assert_ne!(first, chart_image_key(&key, 1));
        assert_ne!(first, chart_image_key(&CacheKey::new("abd"), 0));
        assert_eq!(first.len(), 64);
    }
}
