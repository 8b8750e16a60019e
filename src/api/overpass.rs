use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::{BoundingBox, OverpassConfig};

const USER_AGENT: &str = "coastmask/0.1.0";

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node or way)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub nodes: Option<Vec<u64>>,
    /// Inline way coordinates, present when queried with `out geom`
    #[serde(default)]
    pub geometry: Option<Vec<GeometryPoint>>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// One vertex of an `out geom` way
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GeometryPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Build the Overpass QL query for coastline ways inside `bbox`
fn coastline_query(bbox: &BoundingBox, timeout_secs: u64) -> String {
    // Server timeout stays below the client timeout so the server answers first
    let server_timeout = timeout_secs.saturating_sub(20).max(30);
    format!(
        r#"[out:json][timeout:{timeout}];
(
  way["natural"="coastline"]({south},{west},{north},{east});
);
out geom;"#,
        timeout = server_timeout,
        south = bbox.south,
        west = bbox.west,
        north = bbox.north,
        east = bbox.east
    )
}

/// Fetch coastline ways from Overpass API
///
/// # Returns
/// * The raw JSON response body, ready to be written to the input path
pub fn fetch_coastline(bbox: &BoundingBox, config: &OverpassConfig) -> Result<String> {
    let query = coastline_query(bbox, config.timeout_secs);
    execute_overpass_query(&query, config)
}

/// Execute an Overpass API query against each configured mirror in turn,
/// retrying 429/504 responses with a growing delay
fn execute_overpass_query(query: &str, config: &OverpassConfig) -> Result<String> {
    if config.urls.is_empty() {
        bail!("No Overpass URLs configured");
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let max_retries = config.max_retries.max(1);
    let mut last_error = None;

    for url in &config.urls {
        for attempt in 0..max_retries {
            if attempt > 0 {
                let wait_secs = 30 * attempt as u64;
                warn!(
                    "Overpass API busy, retrying {} in {} seconds (attempt {}/{})",
                    url,
                    wait_secs,
                    attempt + 1,
                    max_retries
                );
                std::thread::sleep(Duration::from_secs(wait_secs));
            }

            debug!("POST {}", url);
            // Overpass expects form-encoded `data=<query>`
            let response = match client.post(url).form(&[("data", query)]).send() {
                Ok(r) => r,
                Err(e) => {
                    warn!("Request to {} failed: {}", url, e);
                    last_error = Some(format!("{}: {}", url, e));
                    break;
                }
            };

            match response.status().as_u16() {
                200 => {
                    return response
                        .text()
                        .context("Failed to read Overpass response body");
                }
                429 | 504 => {
                    last_error = Some(format!(
                        "{} returned status {} (attempt {})",
                        url,
                        response.status(),
                        attempt + 1
                    ));
                    continue;
                }
                status => {
                    last_error = Some(format!("{} returned error status {}", url, status));
                    break;
                }
            }
        }
    }

    bail!(
        "Overpass API failed on all mirrors: {}",
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    )
}
