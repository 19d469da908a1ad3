use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Setting key or cache key involved in the failure
    /// (e.g., "cache.default_ttl_secs", "a1b2c3_expires_at")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "file_cache", "pdf_renderer")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for report assembly, caching and export.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} is not a valid report component!")]
    InvalidComponent { kind: String },

    #[error("Only {available} tables! (index {index} tried)")]
    TableIndexOutOfRange { index: usize, available: usize },

    #[error("No text component with key '{key}'!")]
    UnmatchedEditableField { key: String },

    #[error("Cache backend error: {message}{}", format_context(.context))]
    Cache {
        message: String,
        context: ErrorContext,
    },

    #[error("Field store error: {message}{}", format_context(.context))]
    FieldStore {
        message: String,
        context: ErrorContext,
    },

    #[error("Render error: {message}{}", format_context(.context))]
    Render {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn cache(msg: impl Into<String>) -> Self {
        Error::Cache {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn cache_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Cache {
            message: msg.into(),
            context,
        }
    }

    pub fn field_store(msg: impl Into<String>) -> Self {
        Error::FieldStore {
            message: msg.into(),
            context: ErrorContext::new().with_source("field_store"),
        }
    }

    pub fn render_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Render {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Cache { context, .. }
            | Error::FieldStore { context, .. }
            | Error::Render { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_index_message() {
        let err = Error::TableIndexOutOfRange {
            index: 5,
            available: 2,
        };
        assert_eq!(err.to_string(), "Only 2 tables! (index 5 tried)");
    }

    #[test]
    fn test_context_rendering() {
        let err = Error::configuration_with_context(
            "invalid port",
            ErrorContext::new()
                .with_field_path("server.port")
                .with_source("env"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid port (field: server.port, source: env)"
        );
        assert!(err.context().is_some());
        assert!(Error::cache("down").context().is_some());
        assert_eq!(
            Error::field_store("lock poisoned").to_string(),
            "Field store error: lock poisoned (source: field_store)"
        );
        assert!(Error::UnmatchedEditableField { key: "x".into() }
            .context()
            .is_none());
    }
}
