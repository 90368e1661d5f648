//! Match-listing source.
//!
//! One blocking GET per run, or a local JSON file via `--input`. Failures are
//! typed so the caller can apply the fetch-failure policy instead of aborting.

use crate::{config::SourceConfig, log};
use serde_json::Value;
use std::{fs, path::Path};
use thiserror::Error;

/// Why no payload could be obtained this run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to `{url}` failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{url}` answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("cannot read `{path}`")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch the raw listing document from the configured endpoint.
pub fn fetch(config: &SourceConfig) -> Result<Value, FetchError> {
    let url = config.endpoint.as_str();
    let http_err = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(http_err)?;

    log!("fetch"; "GET {}", url);
    let response = client.get(url).send().map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().map_err(http_err)?;
    parse(&body)
}

/// Load the listing document from a local file.
pub fn load(path: &Path) -> Result<Value, FetchError> {
    let body = fs::read(path).map_err(|source| FetchError::Read {
        path: path.display().to_string(),
        source,
    })?;
    log!("fetch"; "read {}", path.display());
    parse(&body)
}

fn parse(body: &[u8]) -> Result<Value, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
