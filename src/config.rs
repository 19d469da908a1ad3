//! Reporting settings.
//!
//! Loaded from YAML, then adjusted by `REPORT_*` environment variables:
//!
//! ```yaml
//! cache:
//!   default_ttl_secs: 60
//!   key_prefix: reports
//! load_limit: 500
//! admin_email: qa-admin@example.com
//! server:
//!   protocol: https
//!   host: testia.example.com
//!   port: 8443
//! pdf:
//!   page_layout: landscape
//! ```

use crate::cache::CacheConfig;
use crate::render::PdfOptions;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Where the application is reachable; used to build absolute URLs in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
    /// Sub-directory the application is mounted under, with a leading slash. Empty at the web root.
    pub path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: None,
            path: String::new(),
        }
    }
}

impl ServerSettings {
    /// `<protocol>://<host>[:<port>]`
    pub fn www_server(&self) -> Result<String> {
        let server = match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.host, port),
            None => format!("{}://{}", self.protocol, self.host),
        };
        url::Url::parse(&server).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid server url '{}'", server),
                ErrorContext::new()
                    .with_field_path("server")
                    .with_details(e.to_string()),
            )
        })?;
        Ok(server)
    }

    /// Server URL including the mount path.
    pub fn base_url(&self) -> Result<String> {
        Ok(format!("{}{}", self.www_server()?, self.path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub cache: CacheConfig,
    /// How many items tagged lists load at once.
    pub load_limit: usize,
    /// Recipient of automatic notifications.
    pub admin_email: Option<String>,
    pub server: ServerSettings,
    /// Page setup used when a report does not override it.
    pub pdf: PdfOptions,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            load_limit: 500,
            admin_email: None,
            server: ServerSettings::default(),
            pdf: PdfOptions::default(),
        }
    }
}

impl ReportSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "failed to parse report settings",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("yaml"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading report settings");
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Apply `REPORT_*` overrides from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REPORT_CACHE_TTL_SECS") {
            self.cache.default_ttl_secs = parse_var("REPORT_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("REPORT_CACHE_ENABLED") {
            self.cache.enabled = parse_var("REPORT_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = lookup("REPORT_ADMIN_EMAIL") {
            self.admin_email = Some(v);
        }
        if let Some(v) = lookup("REPORT_SERVER_PROTOCOL") {
            self.server.protocol = v;
        }
        if let Some(v) = lookup("REPORT_SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("REPORT_SERVER_PORT") {
            // An empty port means "use the protocol default".
            self.server.port = if v.is_empty() {
                None
            } else {
                Some(parse_var("REPORT_SERVER_PORT", &v)?)
            };
        }
        Ok(self)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        Error::configuration_with_context(
            format!("invalid value '{}'", value),
            ErrorContext::new()
                .with_field_path(name)
                .with_details(e.to_string())
                .with_source("env"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageLayout;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let settings = ReportSettings::default();
        assert_eq!(settings.cache.default_ttl(), Duration::from_secs(60));
        assert_eq!(settings.load_limit, 500);
        assert_eq!(settings.pdf.page_layout, PageLayout::Landscape);
        assert_eq!(settings.server.www_server().unwrap(), "http://localhost");
    }

    #[test]
    fn test_yaml_partial_document() {
        let settings = ReportSettings::from_yaml_str(
            "cache:\n  default_ttl_secs: 0\nserver:\n  protocol: https\n  host: qa.example.com\n  port: 8443\n  path: /testia\n",
        )
        .unwrap();
        assert_eq!(settings.cache.default_ttl_secs, 0);
        assert!(settings.cache.enabled);
        assert_eq!(settings.server.base_url().unwrap(), "https://qa.example.com:8443/testia");
        assert_eq!(settings.load_limit, 500);
    }

    #[test]
    fn test_yaml_errors_are_configuration_errors() {
        let err = ReportSettings::from_yaml_str("load_limit: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REPORT_CACHE_TTL_SECS", "300"),
            ("REPORT_ADMIN_EMAIL", "admin@example.com"),
            ("REPORT_SERVER_PORT", ""),
        ]
        .into_iter()
        .collect();
        let mut base = ReportSettings::default();
        base.server.port = Some(3000);
        let settings = base
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.cache.default_ttl_secs, 300);
        assert_eq!(settings.admin_email.as_deref(), Some("admin@example.com"));
        assert_eq!(settings.server.port, None);

        let err = ReportSettings::default()
            .apply_overrides(|k| (k == "REPORT_SERVER_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("REPORT_SERVER_PORT")
        );
    }

    #[test]
    fn test_invalid_server_url() {
        let server = ServerSettings {
            host: "bad host".to_string(),
            ..ServerSettings::default()
        };
        assert!(server.www_server().is_err());
    }
}
