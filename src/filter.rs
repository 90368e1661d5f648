//! Event normalization and recency filtering.
//!
//! Walks the `events` mapping of the listing document, turning each raw
//! record into an [`Event`] or a [`SkipReason`]. Surviving events become
//! match URLs in traversal order; every valid event contributes its sport
//! to the category set, stale or not.
//!
//! ```text
//! { "events": { "<date>": [ {...}, {...} ] | {...} } }
//!        │
//!        ├── parse_event ── Err(Malformed | MissingField) ──▶ stats
//!        │        │
//!        │        └── Ok(event) ──▶ categories.insert(sport)
//!        │                 │
//!        └──────────── classify ── Skip(Stale) ──▶ stats
//!                          │
//!                          └── Keep(event) ──▶ match_urls.push(url)
//! ```

use crate::{
    config::{RetentionConfig, SitemapConfig, SiteConfig},
    debug,
    generator::id::generate_id,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// A listing record with all required fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub timestamp: i64,
    pub sport: String,
    pub name: String,
}

impl Event {
    /// Opaque identifier shared with the site's match page.
    pub fn id(&self) -> String {
        generate_id(self.timestamp, &self.sport, &self.name)
    }

    /// Absolute URL of this event's match page.
    pub fn url(&self, site: &SiteConfig) -> String {
        format!("{}{}{}", site.base(), site.match_path, self.id())
    }
}

/// Why a record was left out of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not an object, or a field of the wrong type.
    Malformed(&'static str),
    /// Empty sport, empty match name or zero timestamp.
    MissingField,
    /// Started longer ago than the sport's retention window.
    Stale { age_minutes: i64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(field) => write!(f, "malformed `{field}`"),
            Self::MissingField => f.write_str("missing field"),
            Self::Stale { age_minutes } => write!(f, "stale, started {age_minutes} min ago"),
        }
    }
}

/// Result of the recency check on a valid event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Keep(Event),
    Skip(SkipReason),
}

/// Per-run counters, for logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub missing: usize,
    pub stale: usize,
    pub malformed: usize,
}

impl FilterStats {
    fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::Malformed(_) => self.malformed += 1,
            SkipReason::MissingField => self.missing += 1,
            SkipReason::Stale { .. } => self.stale += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.missing + self.stale + self.malformed
    }
}

/// What the sitemap builder needs from one listing document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutput {
    /// Match page URLs, in document order.
    pub match_urls: Vec<String>,
    /// Distinct sports, case-sensitive, sorted.
    pub categories: BTreeSet<String>,
    pub stats: FilterStats,
}

/// Filter every event in `doc` against `now` (unix seconds).
///
/// A document without an `events` object yields empty output.
pub fn filter_events(doc: &Value, now: i64, config: &SitemapConfig) -> FilterOutput {
    let mut output = FilterOutput::default();

    let Some(days) = doc.get("events").and_then(Value::as_object) else {
        return output;
    };

    for raw in days.values().flat_map(day_events) {
        let event = match parse_event(raw) {
            Ok(event) => event,
            Err(reason) => {
                debug!("filter"; "skipped event: {}", reason);
                output.stats.record(&reason);
                continue;
            }
        };

        output.categories.insert(event.sport.clone());

        match classify(event, now, &config.retention) {
            EventOutcome::Keep(event) => {
                output.match_urls.push(event.url(&config.site));
                output.stats.kept += 1;
            }
            EventOutcome::Skip(reason) => {
                debug!("filter"; "skipped event: {}", reason);
                output.stats.record(&reason);
            }
        }
    }

    output
}

/// A date key maps to either one event or a list of events.
fn day_events(value: &Value) -> std::slice::Iter<'_, Value> {
    match value {
        Value::Array(events) => events.iter(),
        single => std::slice::from_ref(single).iter(),
    }
}

/// Validate a raw record.
pub fn parse_event(raw: &Value) -> Result<Event, SkipReason> {
    let Some(fields) = raw.as_object() else {
        return Err(SkipReason::Malformed("event"));
    };

    let timestamp = coerce_timestamp(fields.get("unix_timestamp"))?;
    let sport = coerce_text(fields.get("sport"), "sport")?;
    let name = coerce_name(fields.get("match"))?;

    if sport.is_empty() || name.is_empty() || timestamp == 0 {
        return Err(SkipReason::MissingField);
    }

    Ok(Event {
        timestamp,
        sport,
        name,
    })
}

/// Apply the sport's retention window. Future events are always kept.
pub fn classify(event: Event, now: i64, retention: &RetentionConfig) -> EventOutcome {
    let age_secs = now.saturating_sub(event.timestamp);
    let window_secs = i64::try_from(retention.window_minutes(&event.sport))
        .unwrap_or(i64::MAX)
        .saturating_mul(60);

    if age_secs >= window_secs {
        EventOutcome::Skip(SkipReason::Stale {
            age_minutes: age_secs / 60,
        })
    } else {
        EventOutcome::Keep(event)
    }
}

/// Missing is 0. Integers as-is, floats truncated, numeric strings parsed.
fn coerce_timestamp(value: Option<&Value>) -> Result<i64, SkipReason> {
    const FIELD: &str = "unix_timestamp";
    match value {
        None => Ok(0),
        Some(Value::Number(n)) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
            .ok_or(SkipReason::Malformed(FIELD)),
        // Integers beyond i64 would lose their digits in the identifier
        Some(Value::Number(n)) => n.as_i64().ok_or(SkipReason::Malformed(FIELD)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| SkipReason::Malformed(FIELD)),
        Some(_) => Err(SkipReason::Malformed(FIELD)),
    }
}

/// Match names may arrive as numbers or booleans and are spelled out the
/// way the site's scripts print them. Zero and `false` count as empty.
fn coerce_name(value: Option<&Value>) -> Result<String, SkipReason> {
    match value {
        Some(Value::Bool(true)) => Ok("True".to_owned()),
        Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        other => coerce_text(other, "match"),
    }
}

/// Missing or null is empty; any non-string value is malformed.
fn coerce_text(value: Option<&Value>, field: &'static str) -> Result<String, SkipReason> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SkipReason::Malformed(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn config() -> SitemapConfig {
        SitemapConfig::default()
    }

    fn event(age_secs: i64, sport: &str, name: &str) -> Value {
        json!({ "unix_timestamp": NOW - age_secs, "sport": sport, "match": name })
    }

    fn run(events: Value) -> FilterOutput {
        filter_events(&json!({ "events": { "2023-11-14": events } }), NOW, &config())
    }

    #[test]
    fn test_example_match_url() {
        let output = run(json!([event(100, "Football", "A vs B")]));

        let expected_id = generate_id(1_699_999_900, "Football", "A vs B");
        assert_eq!(
            output.match_urls,
            vec![format!(
                "https://streameastv2.world/Matchinformation/?id={expected_id}"
            )]
        );
        assert_eq!(output.stats.kept, 1);
    }

    #[test]
    fn test_cricket_boundary() {
        let kept = run(json!([event(479 * 60, "Cricket", "Ind vs Aus")]));
        assert_eq!(kept.match_urls.len(), 1);

        let dropped = run(json!([event(480 * 60, "cricket", "Ind vs Aus")]));
        assert!(dropped.match_urls.is_empty());
        assert_eq!(dropped.stats.stale, 1);
    }

    #[test]
    fn test_default_boundary() {
        assert_eq!(run(json!([event(179 * 60, "Tennis", "X vs Y")])).match_urls.len(), 1);
        assert!(run(json!([event(180 * 60, "Tennis", "X vs Y")])).match_urls.is_empty());
    }

    #[test]
    fn test_cricket_hours() {
        assert_eq!(run(json!([event(420 * 60, "CRICKET", "T1 vs T2")])).match_urls.len(), 1);
        assert!(run(json!([event(510 * 60, "CRICKET", "T1 vs T2")])).match_urls.is_empty());
        // Same ages outside cricket are both stale
        assert!(run(json!([event(420 * 60, "Rugby", "T1 vs T2")])).match_urls.is_empty());
    }

    #[test]
    fn test_future_events_kept() {
        let output = run(json!([event(-7 * 24 * 3600, "Boxing", "Main event")]));
        assert_eq!(output.match_urls.len(), 1);
    }

    #[test]
    fn test_invalid_events_excluded_everywhere() {
        let output = run(json!([
            { "unix_timestamp": NOW, "sport": "", "match": "A vs B" },
            { "unix_timestamp": NOW, "sport": "Golf", "match": "" },
            { "unix_timestamp": 0, "sport": "Hockey", "match": "A vs B" },
            { "sport": "Baseball", "match": "A vs B" },
        ]));

        assert!(output.match_urls.is_empty());
        assert!(!output.categories.contains(""));
        assert!(!output.categories.contains("Hockey"));
        assert!(!output.categories.contains("Baseball"));
        assert_eq!(output.categories.len(), 0);
        assert_eq!(output.stats.missing, 4);
    }

    #[test]
    fn test_categories_deduplicated_and_sorted() {
        let output = run(json!([
            event(0, "Football", "A vs B"),
            event(0, "Basketball", "C vs D"),
            event(0, "Football", "E vs F"),
            event(0, "football", "G vs H"),
        ]));

        let categories: Vec<_> = output.categories.iter().map(String::as_str).collect();
        assert_eq!(categories, vec!["Basketball", "Football", "football"]);
        assert_eq!(output.match_urls.len(), 4);
    }

    #[test]
    fn test_stale_sport_still_listed_as_category() {
        let output = run(json!([event(10 * 3600, "Volleyball", "A vs B")]));
        assert!(output.match_urls.is_empty());
        assert!(output.categories.contains("Volleyball"));
    }

    #[test]
    fn test_malformed_event_does_not_abort_batch() {
        let output = run(json!([
            "not an event",
            { "unix_timestamp": "soon", "sport": "F1", "match": "GP" },
            { "unix_timestamp": NOW, "sport": 7, "match": "GP" },
            { "unix_timestamp": [1], "sport": "F1", "match": "GP" },
            event(60, "F1", "Monaco GP"),
        ]));

        assert_eq!(output.match_urls.len(), 1);
        assert_eq!(output.stats.malformed, 4);
        assert_eq!(output.stats.skipped(), 4);
        let categories: Vec<_> = output.categories.iter().collect();
        assert_eq!(categories, vec!["F1"]);
    }

    #[test]
    fn test_timestamp_coercion() {
        let from_string = json!({ "unix_timestamp": " 1699999900 ", "sport": "S", "match": "M" });
        assert_eq!(parse_event(&from_string).unwrap().timestamp, 1_699_999_900);

        let from_float = json!({ "unix_timestamp": 1699999900.75, "sport": "S", "match": "M" });
        assert_eq!(parse_event(&from_float).unwrap().timestamp, 1_699_999_900);

        let null_sport = json!({ "unix_timestamp": 5, "sport": null, "match": "M" });
        assert_eq!(parse_event(&null_sport), Err(SkipReason::MissingField));

        let bool_ts = json!({ "unix_timestamp": true, "sport": "S", "match": "M" });
        assert_eq!(
            parse_event(&bool_ts),
            Err(SkipReason::Malformed("unix_timestamp"))
        );
    }

    #[test]
    fn test_non_string_match_name_spelled_out() {
        let output = run(json!([
            { "unix_timestamp": NOW - 60, "sport": "Football", "match": 2024 },
            { "unix_timestamp": NOW - 60, "sport": "Football", "match": true },
            { "unix_timestamp": NOW - 60, "sport": "Football", "match": 0 },
            { "unix_timestamp": NOW - 60, "sport": "Football", "match": false },
            { "unix_timestamp": NOW - 60, "sport": "Football", "match": ["A", "B"] },
        ]));

        let expected: Vec<String> = ["2024", "True"]
            .iter()
            .map(|name| {
                let id = generate_id(NOW - 60, "Football", name);
                format!("https://streameastv2.world/Matchinformation/?id={id}")
            })
            .collect();
        assert_eq!(output.match_urls, expected);
        assert_eq!(output.stats.kept, 2);
        assert_eq!(output.stats.missing, 2);
        assert_eq!(output.stats.malformed, 1);
    }

    #[test]
    fn test_out_of_range_timestamp_is_malformed() {
        let huge = json!({ "unix_timestamp": 18446744073709551615u64, "sport": "S", "match": "M" });
        assert_eq!(parse_event(&huge), Err(SkipReason::Malformed("unix_timestamp")));

        let huge_float = json!({ "unix_timestamp": 1e300, "sport": "S", "match": "M" });
        assert_eq!(
            parse_event(&huge_float),
            Err(SkipReason::Malformed("unix_timestamp"))
        );

        let max = json!({ "unix_timestamp": i64::MAX, "sport": "S", "match": "M" });
        assert_eq!(parse_event(&max).unwrap().timestamp, i64::MAX);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Malformed("sport").to_string(), "malformed `sport`");
        assert_eq!(SkipReason::MissingField.to_string(), "missing field");
        assert_eq!(
            SkipReason::Stale { age_minutes: 200 }.to_string(),
            "stale, started 200 min ago"
        );
    }

    #[test]
    fn test_single_event_per_date_and_traversal_order() {
        let doc = json!({
            "events": {
                "2023-11-15": event(0, "Darts", "Second"),
                "2023-11-14": [event(0, "Darts", "First a"), event(0, "Darts", "First b")],
            }
        });
        let output = filter_events(&doc, NOW, &config());

        let ids: Vec<String> = ["Second", "First a", "First b"]
            .iter()
            .map(|name| generate_id(NOW, "Darts", name))
            .collect();
        let expected: Vec<String> = ids
            .iter()
            .map(|id| format!("https://streameastv2.world/Matchinformation/?id={id}"))
            .collect();
        assert_eq!(output.match_urls, expected);
    }

    #[test]
    fn test_document_without_events() {
        let config = config();
        assert_eq!(filter_events(&json!({}), NOW, &config), FilterOutput::default());
        assert_eq!(filter_events(&json!(null), NOW, &config), FilterOutput::default());
        assert_eq!(
            filter_events(&json!({ "events": [] }), NOW, &config),
            FilterOutput::default()
        );
    }

    #[test]
    fn test_classify_reports_age() {
        let event = Event {
            timestamp: NOW - 200 * 60,
            sport: "Snooker".into(),
            name: "Final".into(),
        };
        assert_eq!(
            classify(event, NOW, &RetentionConfig::default()),
            EventOutcome::Skip(SkipReason::Stale { age_minutes: 200 })
        );
    }
}
