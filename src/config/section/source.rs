//! `[source]` section configuration.
//!
//! Where the match listing comes from.
//!
//! # Example
//!
//! ```toml
//! [source]
//! endpoint = "https://topembed.pw/api.php?format=json"
//! timeout_secs = 15
//! ```

use crate::config::{ConfigDiagnostics, FieldPath, util::check_http_url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Match-listing API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON endpoint returning `{ "events": { <date>: [event, ...] } }`.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

pub struct SourceFields {
    pub endpoint: FieldPath,
    pub timeout_secs: FieldPath,
}

impl SourceConfig {
    pub const FIELDS: SourceFields = SourceFields {
        endpoint: FieldPath::new("source.endpoint"),
        timeout_secs: FieldPath::new("source.timeout_secs"),
    };

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        check_http_url(&self.endpoint, Self::FIELDS.endpoint, diag);

        if self.timeout_secs == 0 {
            diag.error_with_hint(
                Self::FIELDS.timeout_secs,
                "timeout must be greater than zero",
                "use the default: 15",
            );
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://topembed.pw/api.php?format=json".into(),
            timeout_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_source_config() {
        let config = test_parse_config(
            "[source]\nendpoint = \"http://127.0.0.1:9000/events.json\"\ntimeout_secs = 3",
        );
        assert_eq!(config.source.endpoint, "http://127.0.0.1:9000/events.json");
        assert_eq!(config.source.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_source_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.source.timeout_secs, 15);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let source = SourceConfig {
            timeout_secs: 0,
            ..SourceConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        source.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, SourceConfig::FIELDS.timeout_secs);
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let source = SourceConfig {
            endpoint: "ftp://example.com/events".into(),
            ..SourceConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        source.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
