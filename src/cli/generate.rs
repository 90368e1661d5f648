//! Sitemap generation pass.
//!
//! Pipeline phases:
//! - **Source** - Fetch the listing (or read `--input`), apply the failure policy
//! - **Filter** - Validate events, drop stale ones, collect categories
//! - **Build** - Assemble and render the sitemap document
//! - **Write** - Overwrite the output file (or print with `--stdout`)

use crate::{
    cli::GenerateArgs,
    config::{FetchErrorPolicy, SitemapConfig},
    debug,
    filter::{FilterOutput, filter_events},
    generator::sitemap::{Sitemap, render, write_sitemap},
    log, logger,
    source::{self, FetchError},
};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Run one fetch-transform-write pass.
pub fn generate(args: &GenerateArgs, config: &SitemapConfig) -> Result<()> {
    if args.stdout {
        logger::reserve_stdout();
    }

    let now = resolve_now(args.now)?;
    let doc = obtain_listing(args, config)?;

    let (xml, output) = build_document(doc.as_ref(), now, config)?;

    log!(
        "filter";
        "{} match pages, {} categories",
        output.match_urls.len(),
        output.categories.len()
    );
    debug!(
        "filter";
        "kept {}, skipped {} (stale {}, missing fields {}, malformed {})",
        output.stats.kept,
        output.stats.skipped(),
        output.stats.stale,
        output.stats.missing,
        output.stats.malformed
    );

    if args.stdout {
        print!("{xml}");
        Ok(())
    } else {
        write_sitemap(&xml, &config.output.path)
    }
}

/// Filter the listing (if any) and render the document.
///
/// `None` stands for a failed fetch under the `partial` policy: only the
/// fixed pages are emitted.
pub fn build_document(
    doc: Option<&Value>,
    now: DateTime<Utc>,
    config: &SitemapConfig,
) -> Result<(String, FilterOutput)> {
    let output = doc
        .map(|doc| filter_events(doc, now.timestamp(), config))
        .unwrap_or_default();

    let sitemap = Sitemap::build(&output.match_urls, &output.categories, now, &config.site);
    let xml = render(sitemap, &config.output).context("Failed to render sitemap")?;

    Ok((xml, output))
}

/// Fetch or load the listing, applying the fetch-failure policy.
fn obtain_listing(args: &GenerateArgs, config: &SitemapConfig) -> Result<Option<Value>> {
    let result = match &args.input {
        Some(path) => source::load(path),
        None => source::fetch(&config.source),
    };
    apply_policy(result, config.output.on_fetch_error)
}

fn apply_policy(
    result: Result<Value, FetchError>,
    policy: FetchErrorPolicy,
) -> Result<Option<Value>> {
    match (result, policy) {
        (Ok(doc), _) => Ok(Some(doc)),
        (Err(err), FetchErrorPolicy::Partial) => {
            log!("error"; "{:#}", anyhow!(err));
            log!("fetch"; "no match data this run, writing fixed pages only");
            Ok(None)
        }
        (Err(err), FetchErrorPolicy::Abort) => {
            Err(err).context("No match data and on_fetch_error = \"abort\", sitemap not written")
        }
    }
}

/// Current time, or the `--now` override.
fn resolve_now(now: Option<i64>) -> Result<DateTime<Utc>> {
    match now {
        None => Ok(Utc::now()),
        Some(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| anyhow!("--now {secs} is not a valid unix timestamp")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::id::generate_id;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const NOW: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        resolve_now(Some(NOW)).unwrap()
    }

    #[test]
    fn test_build_document_with_events() {
        let doc = json!({
            "events": {
                "2023-11-14": [
                    { "unix_timestamp": NOW - 100, "sport": "Football", "match": "A vs B" },
                    { "unix_timestamp": NOW - 4 * 3600, "sport": "American Football", "match": "C vs D" },
                ]
            }
        });
        let (xml, output) = build_document(Some(&doc), now(), &SitemapConfig::default()).unwrap();

        let id = generate_id(NOW - 100, "Football", "A vs B");
        assert!(xml.contains(&format!(
            "<loc>https://streameastv2.world/Matchinformation/?id={id}</loc>"
        )));
        assert!(xml.contains("<loc>https://streameastv2.world/Schedule/#/American%20Football</loc>"));
        assert!(xml.contains("<loc>https://streameastv2.world/Schedule/#/Football</loc>"));
        assert_eq!(output.match_urls.len(), 1);
        assert_eq!(xml.matches("<url>").count(), 2 + 2 + 1 + 6);
    }

    #[test]
    fn test_build_document_without_data() {
        let (xml, output) = build_document(None, now(), &SitemapConfig::default()).unwrap();

        assert_eq!(output, FilterOutput::default());
        assert_eq!(xml.matches("<changefreq>always</changefreq>").count(), 2);
        assert_eq!(xml.matches("<changefreq>monthly</changefreq>").count(), 6);
    }

    #[test]
    fn test_partial_policy_recovers() {
        let err = FetchError::Json(serde_json::from_str::<Value>("{").unwrap_err());
        assert!(apply_policy(Err(err), FetchErrorPolicy::Partial).unwrap().is_none());
    }

    #[test]
    fn test_abort_policy_fails() {
        let err = FetchError::Json(serde_json::from_str::<Value>("{").unwrap_err());
        let result = apply_policy(Err(err), FetchErrorPolicy::Abort);
        assert!(result.unwrap_err().to_string().contains("abort"));
    }

    #[test]
    fn test_generate_from_input_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("events.json");
        let out = dir.path().join("sitemap.xml");
        fs::write(
            &input,
            json!({ "events": { "d": { "unix_timestamp": NOW - 60, "sport": "Cricket", "match": "X vs Y" } } })
                .to_string(),
        )
        .unwrap();

        let mut config = SitemapConfig::default();
        config.output.path = out.clone();
        let args = GenerateArgs {
            input: Some(input),
            now: Some(NOW),
            ..GenerateArgs::default()
        };
        generate(&args, &config).unwrap();

        let xml = fs::read_to_string(&out).unwrap();
        assert!(xml.contains("/Schedule/#/Cricket</loc>"));
        assert!(xml.contains(&generate_id(NOW - 60, "Cricket", "X vs Y")));
    }

    #[test]
    fn test_generate_missing_input_abort_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("sitemap.xml");

        let mut config = SitemapConfig::default();
        config.output.path = out.clone();
        config.output.on_fetch_error = FetchErrorPolicy::Abort;
        let args = GenerateArgs {
            input: Some(dir.path().join("missing.json")),
            now: Some(NOW),
            ..GenerateArgs::default()
        };

        assert!(generate(&args, &config).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_generate_missing_input_partial_writes_fixed_pages() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("sitemap.xml");

        let mut config = SitemapConfig::default();
        config.output.path = out.clone();
        let args = GenerateArgs {
            input: Some(dir.path().join("missing.json")),
            now: Some(NOW),
            ..GenerateArgs::default()
        };
        generate(&args, &config).unwrap();

        let xml = fs::read_to_string(&out).unwrap();
        assert_eq!(xml.matches("<url>").count(), 8);
    }

    #[test]
    fn test_resolve_now_override() {
        assert_eq!(now().timestamp(), NOW);
        assert!(resolve_now(Some(i64::MAX)).is_err());
    }
}
