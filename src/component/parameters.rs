use serde::{Deserialize, Serialize};

/// Key/value listing of the parameters a report was run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Name of the report that declared the parameters.
    pub name: String,
    /// Set when the parameters were declared by a subreport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub params: Vec<(String, String)>,
}

impl Parameters {
    pub fn new<I, K, V>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        Self {
            name: name.into(),
            parent_name: None,
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}
