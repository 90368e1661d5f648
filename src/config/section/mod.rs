//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitemap.toml`:
//!
//! | Module      | TOML Section    | Purpose                              |
//! |-------------|-----------------|--------------------------------------|
//! | `source`    | `[source]`      | Match-listing API endpoint, timeout  |
//! | `site`      | `[site]`        | Base URL and fixed page lists        |
//! | `retention` | `[retention]`   | Per-sport staleness windows          |
//! | `output`    | `[output]`      | Output path, minify, failure policy  |

mod output;
mod retention;
mod site;
mod source;

pub use output::{FetchErrorPolicy, OutputConfig};
pub use retention::RetentionConfig;
pub use site::SiteConfig;
pub use source::SourceConfig;
