use anyhow::{Context, Result, bail};
use std::path::Path;
use std::time::Duration;

use super::{MetricTable, TableLayout};
use crate::config::FetchConfig;

const USER_AGENT: &str = "choromap/0.1.0";

/// Whether `source` names an http(s) URL rather than a file
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a file path or fetch an http(s) URL into a string
pub fn read_source(source: &str, fetch: &FetchConfig) -> Result<String> {
    if is_remote(source) {
        fetch_text(source, fetch)
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read {}", source))
    }
}

/// Load a tabular dataset from a file or URL
pub fn load_dataset(source: &str, layout: TableLayout, fetch: &FetchConfig) -> Result<MetricTable> {
    let body = read_source(source, fetch)?;
    let table = MetricTable::from_json(&body, layout)
        .with_context(|| format!("Failed to parse dataset {}", source))?;
    if table.skipped() > 0 {
        eprintln!(
            "Warning: Skipped {} row(s) without a region name in {}",
            table.skipped(),
            source
        );
    }
    Ok(table)
}

/// GET with retries on rate limiting and server errors
fn fetch_text(url: &str, fetch: &FetchConfig) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let attempts = fetch.max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let wait_secs = 2 * attempt as u64;
            eprintln!(
                "Warning: {} unavailable, retrying in {} seconds (attempt {}/{})",
                url,
                wait_secs,
                attempt + 1,
                attempts
            );
            std::thread::sleep(Duration::from_secs(wait_secs));
        }

        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;

        match response.status().as_u16() {
            200..=299 => {
                return response
                    .text()
                    .with_context(|| format!("Failed to read response body from {}", url));
            }
            429 | 500..=599 => {
                last_error = Some(format!(
                    "{} returned status {} (attempt {})",
                    url,
                    response.status(),
                    attempt + 1
                ));
            }
            status => {
                bail!("{} returned error status: {}", url, status);
            }
        }
    }

    bail!(
        "Fetching {} failed after {} attempts: {}",
        url,
        attempts,
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    )
}
