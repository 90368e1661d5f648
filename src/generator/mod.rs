//! Sitemap output generation.
//!
//! - **id**: Match identifiers shared with the site's match page
//! - **sitemap**: `sitemap.xml` assembly and writing

pub mod id;
pub mod sitemap;

use quick_xml::{Reader, events::Event};
use std::borrow::Cow;

/// Minify XML content if enabled.
pub fn minify_xml(content: &str, enabled: bool) -> Cow<'_, str> {
    if enabled {
        let minified = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Cow::Owned(minified)
    } else {
        Cow::Borrowed(content)
    }
}

/// Check that every element in `content` is closed in order.
pub fn check_well_formed(content: &str) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().check_end_names = true;
    loop {
        if let Event::Eof = reader.read_event()? {
            return Ok(());
        }
    }
}
