//! Identifier inspection.

use crate::generator::id::{MatchKey, decode_id};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Print what an identifier refers to.
pub fn decode(id: &str) -> Result<()> {
    let key = decode_id(id).with_context(|| format!("Cannot decode identifier '{id}'"))?;
    println!("{}", describe(&key));
    Ok(())
}

fn describe(key: &MatchKey) -> String {
    let start = DateTime::<Utc>::from_timestamp(key.timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "out of range".to_string());

    format!(
        "timestamp: {}\nstart:     {}\nsport:     {}\nmatch:     {}",
        key.timestamp, start, key.sport, key.name
    )
}
