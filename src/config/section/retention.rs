//! `[retention]` section configuration.
//!
//! How long a match stays in the sitemap after its start time.
//!
//! # Example
//!
//! ```toml
//! [retention]
//! default_minutes = 180
//!
//! [retention.sports]
//! cricket = 480
//! ```
//!
//! Sport keys are matched case-insensitively.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-sport staleness windows, in minutes since start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Window for sports without an entry in `sports`.
    pub default_minutes: u64,

    /// Overrides keyed by lowercase sport name.
    pub sports: BTreeMap<String, u64>,
}

pub struct RetentionFields {
    pub default_minutes: FieldPath,
    pub sports: FieldPath,
}

impl RetentionConfig {
    pub const FIELDS: RetentionFields = RetentionFields {
        default_minutes: FieldPath::new("retention.default_minutes"),
        sports: FieldPath::new("retention.sports"),
    };

    /// Retention window for `sport`, in minutes.
    pub fn window_minutes(&self, sport: &str) -> u64 {
        self.sports
            .get(&sport.to_lowercase())
            .copied()
            .unwrap_or(self.default_minutes)
    }

    /// Lowercase all sport keys so lookups are case-insensitive.
    pub fn normalize(&mut self) {
        self.sports = std::mem::take(&mut self.sports)
            .into_iter()
            .map(|(sport, minutes)| (sport.to_lowercase(), minutes))
            .collect();
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.default_minutes == 0 {
            diag.error(
                Self::FIELDS.default_minutes,
                "retention window must be greater than zero",
            );
        }
        for (sport, minutes) in &self.sports {
            if *minutes == 0 {
                diag.error_with_hint(
                    Self::FIELDS.sports,
                    format!("retention window for '{sport}' must be greater than zero"),
                    format!("remove '{sport}' to fall back to default_minutes"),
                );
            }
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            default_minutes: 180,
            // Cricket formats run for many hours, some for days.
            sports: BTreeMap::from([("cricket".to_string(), 480)]),
        }
    }
}
