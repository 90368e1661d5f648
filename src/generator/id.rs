//! Match identifiers.
//!
//! An identifier is the standard padded Base64 of the UTF-8 bytes of
//! `"{timestamp}_{sport}_{match}"`. The site's match page builds the same
//! value in the browser with `btoa(unescape(encodeURIComponent(s)))`, so the
//! two must agree byte for byte for deep links to resolve.
//!
//! The output is embedded in query strings untouched: `+`, `/` and `=` are
//! not percent-encoded.

use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use thiserror::Error;

const SEPARATOR: char = '_';

/// Derive the identifier for a match.
pub fn generate_id(timestamp: i64, sport: &str, name: &str) -> String {
    let unique = format!("{timestamp}{SEPARATOR}{sport}{SEPARATOR}{name}");
    STANDARD.encode(unique.as_bytes())
}

/// The triple an identifier was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    pub timestamp: i64,
    pub sport: String,
    pub name: String,
}

#[cfg(test)]
impl MatchKey {
    pub fn id(&self) -> String {
        generate_id(self.timestamp, &self.sport, &self.name)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.timestamp, self.sport, self.name)
    }
}

#[derive(Debug, Error)]
pub enum IdError {
    #[error("identifier is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("identifier does not decode to UTF-8 text")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("decoded identifier `{0}` has no `timestamp_sport_match` shape")]
    Shape(String),

    #[error("decoded identifier has invalid timestamp `{0}`")]
    Timestamp(String),
}

/// Recover the triple from an identifier.
///
/// The first two `_` are the separators, so a sport containing `_` splits
/// differently than it was joined; the match name keeps any `_` it has.
pub fn decode_id(id: &str) -> Result<MatchKey, IdError> {
    let bytes = STANDARD.decode(id.trim())?;
    let text = String::from_utf8(bytes)?;

    let mut parts = text.splitn(3, SEPARATOR);
    let (Some(timestamp), Some(sport), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(IdError::Shape(text));
    };

    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| IdError::Timestamp(timestamp.to_string()))?;

    Ok(MatchKey {
        timestamp,
        sport: sport.to_string(),
        name: name.to_string(),
    })
}
