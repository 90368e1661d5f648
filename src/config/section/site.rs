//! `[site]` section configuration.
//!
//! The streaming site the sitemap describes.
//!
//! # Example
//!
//! ```toml
//! [site]
//! base_url = "https://streameastv2.world"
//! daily_pages = ["", "/Schedule/"]
//! monthly_pages = ["/About/", "/Terms/", "/Privacy/", "/Disclaimer/", "/DMCA/", "/Contact/"]
//! category_path = "/Schedule/#/"
//! match_path = "/Matchinformation/?id="
//! ```
//!
//! `""` in `daily_pages` is the homepage.

use crate::config::{ConfigDiagnostics, FieldPath, util::check_http_url};
use serde::{Deserialize, Serialize};

/// Site layout used to build every `<loc>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site origin, without trailing slash.
    pub base_url: String,

    /// Pages stamped with today's date on every run.
    pub daily_pages: Vec<String>,

    /// Pages stamped with the first day of the current month.
    pub monthly_pages: Vec<String>,

    /// Prefix for per-sport category pages.
    pub category_path: String,

    /// Prefix for match pages; the identifier is appended as-is.
    pub match_path: String,
}

pub struct SiteFields {
    pub base_url: FieldPath,
    pub daily_pages: FieldPath,
    pub monthly_pages: FieldPath,
    pub category_path: FieldPath,
    pub match_path: FieldPath,
}

impl SiteConfig {
    pub const FIELDS: SiteFields = SiteFields {
        base_url: FieldPath::new("site.base_url"),
        daily_pages: FieldPath::new("site.daily_pages"),
        monthly_pages: FieldPath::new("site.monthly_pages"),
        category_path: FieldPath::new("site.category_path"),
        match_path: FieldPath::new("site.match_path"),
    };

    /// Base URL with any trailing `/` removed.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL of a site-relative page.
    pub fn page_url(&self, page: &str) -> String {
        format!("{}{}", self.base(), page)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        check_http_url(&self.base_url, Self::FIELDS.base_url, diag);

        check_relative(&self.daily_pages, Self::FIELDS.daily_pages, diag);
        check_relative(&self.monthly_pages, Self::FIELDS.monthly_pages, diag);

        for (path, field) in [
            (&self.category_path, Self::FIELDS.category_path),
            (&self.match_path, Self::FIELDS.match_path),
        ] {
            if !path.starts_with('/') {
                diag.error_with_hint(
                    field,
                    format!("'{path}' must start with '/'"),
                    "paths are appended to site.base_url",
                );
            }
        }
    }
}

/// Page entries are joined to the base URL, so they must be empty or rooted.
fn check_relative(pages: &[String], field: FieldPath, diag: &mut ConfigDiagnostics) {
    for page in pages {
        if !page.is_empty() && !page.starts_with('/') {
            diag.error_with_hint(
                field,
                format!("page '{page}' must be empty or start with '/'"),
                format!("use \"/{page}\""),
            );
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://streameastv2.world".into(),
            daily_pages: ["", "/Schedule/"].map(String::from).to_vec(),
            monthly_pages: [
                "/About/",
                "/Terms/",
                "/Privacy/",
                "/Disclaimer/",
                "/DMCA/",
                "/Contact/",
            ]
            .map(String::from)
            .to_vec(),
            category_path: "/Schedule/#/".into(),
            match_path: "/Matchinformation/?id=".into(),
        }
    }
}
