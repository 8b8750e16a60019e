use anyhow::{Result, bail};
use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

/// Policy constants for stitching coastline segments into rings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct StitchConfig {
    /// Decimal digits kept when quantizing endpoints for matching
    pub precision: u32,
    /// An unclosed chain with more points than this is force-closed
    /// instead of discarded
    pub force_close_min_points: usize,
    /// Extension steps allowed per ring before it is abandoned
    pub max_iterations: usize,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            precision: 7,
            force_close_min_points: 10,
            max_iterations: 10_000,
        }
    }
}

impl StitchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.precision > 12 {
            bail!(
                "stitch.precision must be at most 12 decimal digits (got {})",
                self.precision
            );
        }
        if self.max_iterations == 0 {
            bail!("stitch.max_iterations must be greater than zero");
        }
        // A force-closed ring must still have at least 4 points
        if self.force_close_min_points < 3 {
            bail!(
                "stitch.force_close_min_points must be at least 3 (got {})",
                self.force_close_min_points
            );
        }
        Ok(())
    }
}

/// Area threshold and ranking cut-off for reconstructed rings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Rings with a smaller shoelace area (squared degrees) are noise
    pub min_area: f64,
    /// Number of largest rings kept
    pub max_rings: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_area: 1e-7,
            max_rings: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct ValidateConfig {
    /// Report self-intersecting output rings
    pub check_simple: bool,
}

/// Region the coastline is fetched for, in WGS84 degrees.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn validate(&self) -> Result<()> {
        if self.south >= self.north || self.west >= self.east {
            bail!(
                "Invalid bbox: south/west ({}, {}) must be below north/east ({}, {})",
                self.south,
                self.west,
                self.north,
                self.east
            );
        }
        Ok(())
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("data/coastline.json")
}
fn default_mainland() -> PathBuf {
    PathBuf::from("data/mainland.json")
}
fn default_output() -> PathBuf {
    PathBuf::from("data/land_mask.geojson")
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_mainland")]
    pub mainland: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub stitch: StitchConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub validate: ValidateConfig,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            mainland: default_mainland(),
            output: default_output(),
            bbox: None,
            stitch: StitchConfig::default(),
            filter: FilterConfig::default(),
            validate: ValidateConfig::default(),
            overpass: None,
        }
    }
}

fn default_overpass_urls() -> Vec<String> {
    vec![
        "https://overpass.private.coffee/api/interpreter".to_string(),
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://maps.mail.ru/osm/tools/overpass/api/interpreter".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            urls: default_overpass_urls(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    pub fn validate(&self) -> Result<()> {
        self.stitch.validate()?;
        if let Some(bbox) = &self.bbox {
            bbox.validate()?;
        }
        Ok(())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("coastmask.toml"));
    paths.push(PathBuf::from(".coastmask.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("coastmask").join("config.toml"));
        paths.push(config_dir.join("coastmask.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".coastmask.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.input, PathBuf::from("data/coastline.json"));
        assert_eq!(config.output, PathBuf::from("data/land_mask.geojson"));
        assert_eq!(config.stitch, StitchConfig::default());
        assert_eq!(config.filter.max_rings, 50);
        assert!(!config.validate.check_simple);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config: FileConfig = toml::from_str(
            r#"
            output = "out/mask.geojson"
            bbox = { south = 37.6, west = -122.6, north = 37.9, east = -122.3 }

            [stitch]
            force_close_min_points = 25

            [filter]
            max_rings = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("out/mask.geojson"));
        assert_eq!(config.stitch.force_close_min_points, 25);
        assert_eq!(config.stitch.precision, 7);
        assert_eq!(config.filter.max_rings, 10);
        assert_eq!(config.filter.min_area, 1e-7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_stitch_policy() {
        let mut stitch = StitchConfig::default();
        stitch.force_close_min_points = 2;
        assert!(stitch.validate().is_err());

        let mut stitch = StitchConfig::default();
        stitch.max_iterations = 0;
        assert!(stitch.validate().is_err());

        let mut stitch = StitchConfig::default();
        stitch.precision = 15;
        assert!(stitch.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_bbox() {
        let bbox = BoundingBox {
            south: 38.0,
            west: -122.6,
            north: 37.6,
            east: -122.3,
        };
        assert!(bbox.validate().is_err());
    }

    #[test]
    fn test_overpass_defaults() {
        let config = OverpassConfig::default();
        assert_eq!(config.urls.len(), 3);
        assert_eq!(config.max_retries, 3);
    }
}
