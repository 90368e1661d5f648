//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing the site's fixed pages, one page per
//! sport category and one page per current match.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>always</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! # Entry Groups
//!
//! | Group         | lastmod            | changefreq | priority |
//! |---------------|--------------------|------------|----------|
//! | daily pages   | today              | always     | 1.0      |
//! | categories    | today              | always     | 0.9      |
//! | matches       | today              | always     | 0.8      |
//! | monthly pages | 1st of this month  | monthly    | 0.5      |
//!
//! Match pages are stamped with today's date even when the match started
//! yesterday.

use crate::{
    config::{OutputConfig, SiteConfig},
    generator::{check_well_formed, minify_xml},
    log,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Characters left as-is by the browser's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("generated sitemap is not well-formed XML")]
    Malformed(#[from] quick_xml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Monthly,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    pub urls: Vec<UrlEntry>,
}

impl Sitemap {
    /// Assemble the four entry groups in order.
    pub fn build(
        match_urls: &[String],
        categories: &BTreeSet<String>,
        now: DateTime<Utc>,
        site: &SiteConfig,
    ) -> Self {
        let today = now.date_naive();
        let month_start = today.with_day(1).unwrap_or(today);

        let entry = |loc: String, lastmod, changefreq, priority| UrlEntry {
            loc,
            lastmod,
            changefreq,
            priority,
        };

        let daily = site
            .daily_pages
            .iter()
            .map(|page| entry(site.page_url(page), today, ChangeFreq::Always, 1.0));

        let category_pages = categories.iter().map(|sport| {
            let loc = format!(
                "{}{}{}",
                site.base(),
                site.category_path,
                encode_component(sport)
            );
            entry(loc, today, ChangeFreq::Always, 0.9)
        });

        let matches = match_urls
            .iter()
            .map(|url| entry(url.clone(), today, ChangeFreq::Always, 0.8));

        let monthly = site
            .monthly_pages
            .iter()
            .map(|page| entry(site.page_url(page), month_start, ChangeFreq::Monthly, 0.5));

        let urls = daily
            .chain(category_pages)
            .chain(matches)
            .chain(monthly)
            .collect();

        Self { urls }
    }

    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 160);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_loc(&entry.loc));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod.format("%Y-%m-%d").to_string());
            xml.push_str("</lastmod>\n    <changefreq>");
            xml.push_str(entry.changefreq.as_str());
            xml.push_str("</changefreq>\n    <priority>");
            xml.push_str(&format!("{:.1}", entry.priority));
            xml.push_str("</priority>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Render the final document text, minified if configured.
pub fn render(sitemap: Sitemap, output: &OutputConfig) -> Result<String, SitemapError> {
    let xml = sitemap.into_xml();
    check_well_formed(&xml)?;
    Ok(minify_xml(&xml, output.minify).into_owned())
}

/// Overwrite `path` with the document.
pub fn write_sitemap(xml: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, xml)
        .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;

    log!("sitemap"; "wrote {}", path.display());
    Ok(())
}

/// Percent-encode a path component the way `encodeURIComponent` does.
pub fn encode_component(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, URI_COMPONENT).into()
}

/// Escape `&`, the only XML-special character generated locations carry.
fn escape_loc(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace('&', "&amp;"))
}
